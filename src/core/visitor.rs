// src/core/visitor.rs

use crate::{
    core::{argument::Argument, cursor::Cursor, error::ArgError, resolver::find_visitor},
    models::{ArgumentsMap, Config, Signal, visitor},
};
use std::env;

/// Walks the configured tokens once, calling the handler of every known key
/// and `Config::on_unknown` for everything else.
///
/// - The map is run through the configured preprocessor first (grouped keys
///   like `"-o, --out-dir"` are expanded by default).
/// - Each token is split on the separator; the key is followed through the
///   alias chain before lookup.
/// - A handler returning the walk's break signal ([`Argument::stop`]) ends the
///   walk. Tokens taken by a handler as values are not dispatched again.
///
/// Without `Config::tokens`, the process arguments (minus the program name)
/// are walked.
///
/// # Errors
/// The first error returned by a handler ends the walk and is returned as is.
/// Changes made by earlier handlers are kept.
pub fn visit_argv(known: ArgumentsMap, config: Config) -> Result<(), ArgError> {
    let Config {
        tokens,
        separator,
        breaker,
        formatter,
        preprocessor,
        unknown,
    } = config;

    let mut known = preprocessor(known);
    let tokens = tokens.unwrap_or_else(|| env::args().skip(1).collect());
    let mut unknown = unknown.unwrap_or_else(|| visitor(|_| Ok(Signal::Continue)));

    log::debug!(
        "Visiting {} argument(s) with {} known key(s), separator '{}'",
        tokens.len(),
        known.len(),
        separator
    );

    let mut cursor = Cursor::new(tokens, separator);

    while !cursor.is_exhausted() {
        let written = cursor.enter();
        let key = find_visitor(&written, &known).0.to_string();
        cursor.resolve_to(key.as_str());

        log::trace!(
            "[{}] '{}' -> '{}'",
            cursor.arg_index(),
            cursor.raw(),
            key
        );

        let mut argument = Argument::new(&mut cursor, &formatter, &breaker);
        let signal = match known.visitor_mut(&key) {
            Some(visit) => visit(&mut argument)?,
            None => unknown(&mut argument)?,
        };

        if signal.stops(&breaker) {
            log::debug!("Walk stopped at '{}' by {:?}", key, breaker);
            break;
        }

        cursor.advance();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Breaker;
    use std::{cell::RefCell, rc::Rc};

    fn recorder() -> (Rc<RefCell<Vec<String>>>, Rc<RefCell<Vec<String>>>) {
        (Rc::new(RefCell::new(Vec::new())), Rc::new(RefCell::new(Vec::new())))
    }

    #[test]
    fn test_empty_map_and_no_fallback_is_a_no_op() {
        let result = visit_argv(
            ArgumentsMap::new(),
            Config::new().tokens(["--a", "b", "-c=d", "---", "e"]),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_unknown_receives_every_token_without_map() {
        let (seen, _) = recorder();
        let sink = Rc::clone(&seen);

        visit_argv(
            ArgumentsMap::new(),
            Config::new()
                .tokens(["build", "--fast", "src"])
                .on_unknown(move |arg| {
                    sink.borrow_mut().push(arg.raw().to_string());
                    Ok(Signal::Continue)
                }),
        )
        .unwrap();

        assert_eq!(*seen.borrow(), vec!["build", "--fast", "src"]);
    }

    #[test]
    fn test_look_ahead_value_is_not_dispatched_again() {
        // --- Setup ---
        let (values, unknown) = recorder();
        let (sink, other) = (Rc::clone(&values), Rc::clone(&unknown));

        let known = ArgumentsMap::new().handler("--name", move |arg| {
            sink.borrow_mut().extend(arg.value());
            Ok(Signal::Continue)
        });

        // --- Execute ---
        visit_argv(
            known,
            Config::new()
                .tokens(["--name", "cleo", "file.txt"])
                .on_unknown(move |arg| {
                    other.borrow_mut().push(arg.raw().to_string());
                    Ok(Signal::Continue)
                }),
        )
        .unwrap();

        // --- Assert ---
        assert_eq!(*values.borrow(), vec!["cleo"]);
        assert_eq!(*unknown.borrow(), vec!["file.txt"]);
    }

    #[test]
    fn test_consume_skips_tokens_and_reset_restores_them() {
        // --- Setup ---
        let (pairs, unknown) = recorder();
        let (sink, other) = (Rc::clone(&pairs), Rc::clone(&unknown));

        let known = ArgumentsMap::new()
            .handler("--pair", move |arg| {
                let mut next = arg.next_arg();
                let left = next.consume().unwrap_or_default();
                let right = next.consume().unwrap_or_default();
                sink.borrow_mut().push(format!("{left}:{right}"));
                Ok(Signal::Continue)
            })
            .handler("--peek", |arg| {
                arg.next_arg().consume();
                arg.next_arg().reset();
                Ok(Signal::Continue)
            });

        // --- Execute ---
        visit_argv(
            known,
            Config::new()
                .tokens(["--pair", "a", "b", "--peek", "c"])
                .on_unknown(move |arg| {
                    other.borrow_mut().push(arg.raw().to_string());
                    Ok(Signal::Continue)
                }),
        )
        .unwrap();

        // --- Assert ---
        assert_eq!(*pairs.borrow(), vec!["a:b"]);
        assert_eq!(*unknown.borrow(), vec!["c"]);
    }

    #[test]
    fn test_break_stops_the_walk() {
        let (seen, _) = recorder();
        let sink = Rc::clone(&seen);

        let known = ArgumentsMap::new().handler("--", |arg| Ok(arg.stop()));

        visit_argv(
            known,
            Config::new()
                .tokens(["a", "--", "b", "c"])
                .on_unknown(move |arg| {
                    sink.borrow_mut().push(arg.raw().to_string());
                    Ok(Signal::Continue)
                }),
        )
        .unwrap();

        assert_eq!(*seen.borrow(), vec!["a"]);
    }

    #[test]
    fn test_foreign_breaker_is_ignored() {
        let (seen, _) = recorder();
        let sink = Rc::clone(&seen);
        let foreign = Breaker::new("not this walk's");

        let known =
            ArgumentsMap::new().handler("--", move |_| Ok(Signal::Break(foreign.clone())));

        visit_argv(
            known,
            Config::new()
                .tokens(["--", "b"])
                .on_unknown(move |arg| {
                    sink.borrow_mut().push(arg.raw().to_string());
                    Ok(Signal::Continue)
                }),
        )
        .unwrap();

        assert_eq!(*seen.borrow(), vec!["b"]);
    }

    #[test]
    fn test_configured_breaker_stops_from_unknown() {
        let (seen, _) = recorder();
        let sink = Rc::clone(&seen);
        let stop = Breaker::new("stop");
        let returned = stop.clone();

        visit_argv(
            ArgumentsMap::new(),
            Config::new()
                .tokens(["a", "STOP", "b"])
                .breaker(stop)
                .on_unknown(move |arg| {
                    sink.borrow_mut().push(arg.raw().to_string());
                    if arg.raw() == "STOP" {
                        return Ok(Signal::Break(returned.clone()));
                    }
                    Ok(Signal::Continue)
                }),
        )
        .unwrap();

        assert_eq!(*seen.borrow(), vec!["a", "STOP"]);
    }

    #[test]
    fn test_custom_separator_and_formatter() {
        let (seen, _) = recorder();
        let sink = Rc::clone(&seen);

        let known = ArgumentsMap::new().handler("--name", move |arg| {
            let value = arg.value().unwrap_or_default();
            sink.borrow_mut().push(format!("{}={}", arg.name(), value));
            Ok(Signal::Continue)
        });

        visit_argv(
            known,
            Config::new()
                .tokens(["--name:a=b"])
                .separator(":")
                .formatter(|key| key.trim_start_matches('-').to_uppercase()),
        )
        .unwrap();

        assert_eq!(*seen.borrow(), vec!["NAME=a=b"]);
    }

    #[test]
    fn test_custom_preprocessor_replaces_the_default() {
        let (seen, _) = recorder();
        let sink = Rc::clone(&seen);

        let known = ArgumentsMap::new().handler("-a, --all", move |arg| {
            sink.borrow_mut().push(arg.key().to_string());
            Ok(Signal::Continue)
        });

        visit_argv(
            known,
            Config::new()
                .tokens(["-a", "--all", "-a, --all"])
                .preprocessor(|map| map),
        )
        .unwrap();

        assert_eq!(*seen.borrow(), vec!["-a, --all"]);
    }

    #[test]
    fn test_handler_errors_propagate() {
        // --- Setup ---
        let (seen, _) = recorder();
        let sink = Rc::clone(&seen);

        let known = ArgumentsMap::new()
            .handler("--ok", move |arg| {
                sink.borrow_mut().push(arg.key().to_string());
                Ok(Signal::Continue)
            })
            .handler("--fail", |arg| {
                Err(ArgError::MissingValue {
                    key: arg.key().to_string(),
                })
            });

        // --- Execute ---
        let result = visit_argv(known, Config::new().tokens(["--ok", "--fail", "--ok"]));

        // --- Assert ---
        assert!(matches!(result, Err(ArgError::MissingValue { key }) if key == "--fail"));
        assert_eq!(*seen.borrow(), vec!["--ok"]);
    }
}
