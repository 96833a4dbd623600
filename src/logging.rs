use env_logger::Builder;
use env_logger::fmt::{Color, Formatter};
use log::{Level, LevelFilter, Record};
use std::io::Write;
use std::path::Path;

const SUCCESS_TINT: (u8, u8, u8) = (0, 255, 0);
const WARNING_TINT: (u8, u8, u8) = (255, 255, 0);

/// 50 / 50 blend of two RGB colors
#[inline]
fn blend((r1, g1, b1): (u8, u8, u8), (r2, g2, b2): (u8, u8, u8)) -> (u8, u8, u8) {
    (
        ((r1 as u16 + r2 as u16) / 2) as u8,
        ((g1 as u16 + g2 as u16) / 2) as u8,
        ((b1 as u16 + b2 as u16) / 2) as u8,
    )
}

#[inline]
fn base_rgb(level: Level) -> (u8, u8, u8) {
    match level {
        Level::Error => (255, 0, 0),
        Level::Warn => (255, 255, 0),
        Level::Info => (255, 255, 255),
        Level::Debug => (200, 200, 255),
        Level::Trace => (220, 220, 220),
    }
}

/// Color of a record: the level's base color, tinted for the `success` and `warning` targets.
fn record_rgb(record: &Record) -> (u8, u8, u8) {
    match record.target() {
        "success" => blend(base_rgb(record.level()), SUCCESS_TINT),
        "warning" => blend(base_rgb(record.level()), WARNING_TINT),
        _ => base_rgb(record.level()),
    }
}

/// `src/matcher.rs:42`, relative to the crate root when the path allows it.
fn location(record: &Record) -> String {
    let file = Path::new(record.file().unwrap_or("unknown"));
    let relative = file
        .strip_prefix(env!("CARGO_MANIFEST_DIR"))
        .unwrap_or(file)
        .to_string_lossy()
        .replace('\\', "/");
    format!("{relative}:{}", record.line().unwrap_or(0))
}

/// Installs the colored console logger.
///
/// `level` is the default filter; `RUST_LOG` still overrides it per module.
///
/// # Errors
/// When a logger was installed already.
pub fn init_log(level: LevelFilter) -> anyhow::Result<()> {
    Builder::new()
        .format(|buf: &mut Formatter, record: &Record| {
            let mut style = buf.style();
            let (r, g, b) = record_rgb(record);
            style.set_color(Color::Rgb(r, g, b));
            match record.level() {
                Level::Error | Level::Warn => style.set_bold(true),
                Level::Trace => style.set_dimmed(true),
                _ => style.set_bold(false),
            };

            writeln!(
                buf,
                "[{} {}] {}  {}",
                chrono::Local::now().format("%H:%M:%S"),
                style.value(record.level()),
                style.value(record.args()),
                location(record)
            )
        })
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .map_err(Into::into)
}

#[macro_export]
macro_rules! info_success {
    ($($arg:tt)*) => {
        ::log::info!(target: "success", "[SUCCESS] {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! debug_success {
    ($($arg:tt)*) => {
        ::log::debug!(target: "success", "[SUCCESS] {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! trace_success {
    ($($arg:tt)*) => {
        ::log::trace!(target: "success", "[SUCCESS] {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! debug_warning
{ ($($arg:tt)*) => { ::log::debug!(target: "warning",  "[WARNING] {}",  format!($($arg)*)); }; }
#[macro_export]
macro_rules! info_warning
{ ($($arg:tt)*) => { ::log::info! (target: "warning",  "[WARNING] {}",  format!($($arg)*)); }; }
