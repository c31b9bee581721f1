//! Shell quoting for command lines shown in logs and reports.

const SHELL_META: &[char] = &[
    ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}',
    '<', '>', '|', '&', ';', '#', '~',
];

/// Single-quote `arg` when a POSIX shell would otherwise split or expand it.
pub fn quote_arg(arg: &str) -> String {
    match arg {
        "" => "''".to_string(),
        plain if !plain.contains(SHELL_META) => plain.to_string(),
        quoted => format!("'{}'", quoted.replace('\'', "'\\''")),
    }
}

/// Quote and join a program and its arguments.
pub fn join_command(program: &str, args: &[String]) -> String {
    std::iter::once(quote_arg(program))
        .chain(args.iter().map(|a| quote_arg(a)))
        .collect::<Vec<_>>()
        .join(" ")
}
