use urline_logger::log_info;

pub const HELP_TEXT: &str = "Use TAB key for completion\r\nCommands:\r\n\
\thelp - this message\r\n\
\tclear - clear screen\r\n\
\tlist - list all commands\r\n\
\tname [string] - print the stored name, or set it to 'string'\r\n\
\tversion {lib|demo} - print the library or demo version\r\n\
\tled {on|off} - drive the demo led\r\n";

pub fn init() {
    log_info!("urline demo shell started");
}

pub fn led(onoff: bool) {
    if onoff {
        log_info!("led | ON");
    } else {
        log_info!("led | OFF");
    }
}

pub fn version_lib() {
    log_info!("urline v{}", env!("CARGO_PKG_VERSION"));
}

pub fn version_demo() {
    log_info!("demo v1.0");
}
