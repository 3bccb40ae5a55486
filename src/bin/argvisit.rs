// src/bin/argvisit.rs

use anyhow::Result;
use argvisit::{ArgumentsMap, Config, Proxy, Signal, visit_argv};
use colored::*;
use serde_json::Value;
use std::{cell::RefCell, rc::Rc};

/// Walks the process arguments with a small build-tool style map and prints the
/// resulting config object as JSON.
///
/// ```text
/// argvisit src/main.rs -o dist -r a,b --mode fast -v --- --extra args
/// ```
fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let proxy = Proxy::default();
    let get = proxy.get();

    let files = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&files);

    let known = ArgumentsMap::new()
        .visitor("-o, --out-dir", proxy.value())
        .alias("-r", "--require")
        .visitor("--require", proxy.collect())
        .visitor("-v, --verbose", proxy.value_with(proxy.flag()))
        .visitor("-j, --jobs", proxy.value_with(get.number()))
        .alias("--no-color", "--color")
        .visitor("--color", proxy.value_with(get.flag()))
        .visitor("--mode", proxy.unique())
        .visitor("---", proxy.last());

    let config = Config::new().on_unknown(move |arg| {
        if !arg.raw().starts_with('-') {
            sink.borrow_mut().push(Value::String(arg.raw().to_string()));
        } else {
            log::warn!("Ignoring unknown option '{}'", arg.raw());
        }
        Ok(Signal::Continue)
    });

    visit_argv(known, config)?;

    let mut result = proxy.config();
    // `---` has no letters left after formatting.
    if let Some(rest) = result.remove("") {
        result.insert("rest".to_string(), rest);
    }
    result.insert("files".to_string(), Value::Array(files.take()));
    log::debug!("Collected {} propert(ies)", result.len());

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
