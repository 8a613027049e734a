//! Keyword-style invocation.
//!
//! Accepts `cfgvti add name NAME key MARK remote IP local IP` (keywords in
//! any order) and rewrites it to the flag form clap parses.

use std::ffi::OsString;

const KEYWORDS: [&str; 4] = ["name", "key", "remote", "local"];

/// Rewrite keyword-style arguments into flag form.
///
/// `args` includes the program name. Anything that is not made up only of
/// an action and keyword/value pairs is returned unchanged.
pub fn rewrite(args: Vec<OsString>) -> Vec<OsString> {
    let Some((program, rest)) = args.split_first() else {
        return args;
    };

    let mut action = None;
    let mut name = None;
    let mut flags = Vec::new();

    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        let Some(word) = arg.to_str() else {
            return args;
        };
        match word {
            "add" | "del" if action.is_none() => action = Some(arg.clone()),
            w if KEYWORDS.contains(&w) => {
                let Some(value) = iter.next() else {
                    return args;
                };
                if w == "name" {
                    name = Some(value.clone());
                } else {
                    flags.push(OsString::from(format!("--{}", w)));
                    flags.push(value.clone());
                }
            }
            _ => return args,
        }
    }

    let Some(action) = action else {
        return args;
    };
    if name.is_none() && flags.is_empty() {
        return args;
    }

    let mut out = vec![program.clone(), action];
    out.extend(name);
    out.extend(flags);
    out
}
