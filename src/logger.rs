use crate::config::FoundationConfig;
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    collections::VecDeque,
    io::{self, Write},
    // Std mutex
    sync::{Arc, Mutex},
};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const MAX_LOG_LINES: usize = 20000;
const LOG_FILE_PREFIX: &str = "privacyguard";

// Values following these keywords are masked in the in-memory logs
const SANITIZED_KEYWORDS: [&str; 6] = ["password", "key", "token", "email", "suffix", "hash"];

lazy_static! {
    static ref KEYWORD_PATTERNS: Vec<Regex> = SANITIZED_KEYWORDS
        .iter()
        .filter_map(|keyword| keyword_pattern(keyword))
        .collect();
    static ref EMAIL_PATTERN: Option<Regex> =
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").ok();
}

fn keyword_pattern(keyword: &str) -> Option<Regex> {
    Regex::new(&format!(
        r#"(?P<key>"?(\b{})"?\s*[:=]?\s*)("(?P<val1>[^"]+)"|(?P<val2>\b[^\s",}}]+))"#,
        regex::escape(keyword)
    ))
    .ok()
}

/// Mask keyword values and email addresses, keeping their length.
pub fn sanitize_log_line(input: &str) -> String {
    let mut output = input.to_string();

    for re in KEYWORD_PATTERNS.iter() {
        output = re
            .replace_all(&output, |caps: &regex::Captures| {
                let key = &caps["key"];
                let val1 = caps.name("val1").map_or("", |m| m.as_str());
                let val2 = caps.name("val2").map_or("", |m| m.as_str());
                let val = if !val1.is_empty() { val1 } else { val2 };
                let quotes = if !val1.is_empty() { "\"" } else { "" };

                format!("{}{}{}{}", key, quotes, "*".repeat(val.len()), quotes)
            })
            .to_string();
    }

    if let Some(re) = EMAIL_PATTERN.as_ref() {
        output = re
            .replace_all(&output, |caps: &regex::Captures| "*".repeat(caps[0].len()))
            .to_string();
    }

    output
}

pub struct MemoryWriterData {
    logs: VecDeque<String>,
    lines: usize,
    to_take: usize,
}

impl MemoryWriterData {
    pub fn new() -> Self {
        Self {
            logs: VecDeque::new(),
            lines: 0,
            to_take: 0,
        }
    }

    fn push(&mut self, line: String) {
        // If we have more than MAX_LOG_LINES, remove the oldest one
        if self.logs.len() >= MAX_LOG_LINES {
            self.logs.pop_back();
            self.lines -= 1;
        }

        // Latest at the beginning
        self.logs.push_front(line);
        if self.lines < MAX_LOG_LINES {
            self.lines += 1;
        }
        if self.to_take < MAX_LOG_LINES {
            self.to_take += 1;
        }
    }
}

impl Default for MemoryWriterData {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps formatted, sanitized log lines in memory so they can be shown or exported.
#[derive(Clone)]
pub struct MemoryWriter {
    data: Arc<Mutex<MemoryWriterData>>,
}

impl MemoryWriter {
    pub fn new(data: Arc<Mutex<MemoryWriterData>>) -> Self {
        Self { data }
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let log_line = String::from_utf8_lossy(buf);
        let log_line_sanitized = sanitize_log_line(log_line.trim_end());
        if log_line_sanitized.is_empty() {
            return Ok(buf.len());
        }
        match self.data.lock() {
            Ok(mut locked_data) => {
                locked_data.push(log_line_sanitized);
                Ok(buf.len())
            }
            Err(e) => {
                // Use print to avoid recursion
                println!("Error writing log line to memory logger: {}", e);
                Err(io::Error::new(io::ErrorKind::Other, e.to_string()))
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MemoryWriter {
    type Writer = MemoryWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

pub struct FoundationLogger {
    memory_writer_data: Arc<Mutex<MemoryWriterData>>,
    // Flushes the log file when dropped
    _file_guard: Option<WorkerGuard>,
    installed: bool,
}

impl FoundationLogger {
    pub fn new(config: &FoundationConfig) -> Self {
        let memory_writer_data = Arc::new(Mutex::new(MemoryWriterData::new()));

        let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|e| {
            println!(
                "Invalid log level '{}', falling back to info: {}",
                config.log_level, e
            );
            EnvFilter::new("info")
        });

        let memory_layer = fmt::layer()
            .with_ansi(false)
            .with_writer(MemoryWriter::new(memory_writer_data.clone()));
        let stdout_layer = fmt::layer().with_writer(io::stdout);

        let (file_layer, file_guard) = match &config.log_dir {
            Some(dir) => match RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix("log")
                .build(dir)
            {
                Ok(appender) => {
                    let (writer, guard) = tracing_appender::non_blocking(appender);
                    (
                        Some(fmt::layer().with_ansi(false).with_writer(writer)),
                        Some(guard),
                    )
                }
                Err(e) => {
                    println!("Failed to open log directory {}: {}", dir.display(), e);
                    (None, None)
                }
            },
            None => (None, None),
        };

        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(stdout_layer)
            .with(memory_layer)
            .with(file_layer)
            .try_init()
            .is_ok();

        if installed {
            info!("Logger initialized with level '{}'", config.log_level);
        } else {
            error!("A global logger is already installed, in-memory logs will stay empty");
        }

        Self {
            memory_writer_data,
            _file_guard: file_guard,
            installed,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Lines logged since the previous call, newest first.
    pub fn get_new_logs(&self) -> String {
        let Ok(mut locked_data) = self.memory_writer_data.lock() else {
            return String::new();
        };
        let new_logs: String = locked_data
            .logs
            .iter()
            .take(locked_data.to_take)
            .fold(String::new(), |acc, x| format!("{}\n{}", acc, x));
        locked_data.to_take = 0;
        new_logs
    }

    pub fn get_all_logs(&self) -> String {
        let Ok(locked_data) = self.memory_writer_data.lock() else {
            return String::new();
        };
        locked_data
            .logs
            .iter()
            .fold(String::new(), |acc, x| format!("{}\n{}", acc, x))
    }
}

pub fn init_logger(config: &FoundationConfig) -> FoundationLogger {
    FoundationLogger::new(config)
}
