//! Hosted demo: a small interactive shell on stdin/stdout.
//!
//! Puts the terminal into raw mode, feeds every stdin byte into the editor
//! and wires the demo command set from `urline_usercode`. Run it from a
//! real terminal; Tab completes, Up/Down walk the history.

use std::io::Read;

use urline_config as config;
use urline_core::{Editor, Hooks, RawMode, StdoutSink};
use urline_logger::{init_logger, LoggerConfig};
use urline_usercode::{commands, complete};

/// Demo state handed to the callbacks: the value stored by `name`.
#[derive(Default)]
struct Demo {
    name: heapless::String<16>,
}

type Shell = Editor<
    StdoutSink,
    Demo,
    { config::CMDLINE_CAP },
    { config::TOKEN_CAP },
    { config::QUOTED_TOKEN_CAP },
    { config::HISTORY_CAP },
    { config::PRINT_BUFFER_CAP },
>;

fn execute(hooks: &mut Hooks<'_, StdoutSink, Demo>, args: &[&[u8]]) -> i32 {
    match args[0] {
        b"help" => hooks.print(commands::HELP_TEXT),
        b"clear" => hooks.print("\x1b[2J\x1b[H"),
        b"list" => {
            for name in complete::KEYWORDS {
                hooks.print("\t");
                hooks.print(name);
                hooks.print(config::ENDL);
            }
        }
        b"name" => match args.get(1) {
            Some(&value) => match core::str::from_utf8(value) {
                Ok(s) => {
                    let stored = hooks.user();
                    stored.name.clear();
                    if stored.name.push_str(s).is_err() {
                        hooks.print("name value too long!\r\n");
                    }
                }
                Err(_) => hooks.print("name value not printable\r\n"),
            },
            None => {
                let name = hooks.user().name.clone();
                hooks.print(name.as_str());
                hooks.print(config::ENDL);
            }
        },
        b"version" => match args.get(1) {
            Some(&b"lib") => commands::version_lib(),
            Some(&b"demo") => commands::version_demo(),
            Some(&other) => {
                hooks.print_bytes(other);
                hooks.print(" wrong argument, see help\r\n");
            }
            None => hooks.print("version needs one argument, see help\r\n"),
        },
        b"led" => match args.get(1) {
            Some(&b"on") => commands::led(true),
            Some(&b"off") => commands::led(false),
            _ => hooks.print("led needs on|off\r\n"),
        },
        other => {
            hooks.print("command: '");
            hooks.print_bytes(other);
            hooks.print("' not found\r\n");
        }
    }
    0
}

fn completer(_: &mut Hooks<'_, StdoutSink, Demo>, args: &[&[u8]]) -> &'static [&'static str] {
    complete::candidates_for(args)
}

fn sigint(hooks: &mut Hooks<'_, StdoutSink, Demo>) {
    hooks.print("^C");
    hooks.print(config::ENDL);
}

fn main() {
    init_logger(LoggerConfig::default());
    commands::init();

    let _raw = RawMode::new(0);
    let mut shell = Shell::new(StdoutSink, Demo::default());
    shell.set_prompt(config::PROMPT, config::PROMPT_WIDTH);
    shell.set_endl(config::ENDL);
    shell.set_execute(execute);
    shell.set_complete(completer);
    shell.set_sigint(sigint);

    for byte in std::io::stdin().bytes() {
        let Ok(byte) = byte else { break };
        shell.insert_byte(byte);
        shell.flush();
    }
}
