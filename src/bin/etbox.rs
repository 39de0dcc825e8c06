//! etbox - reference host for the encrypting input control
//!
//! Feeds text into an `InputControl` the way a form would and prints the
//! resulting records as JSON lines on stdout.

use std::cell::RefCell;
use std::error::Error as StdError;
use std::fs::File;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use encrypted_textbox::error::{ErrorCategory, ErrorKind, Result, TextboxError};
use encrypted_textbox::secret::{
    self, EnvSecretKey, ReaderSecretKey, SecretKeySource, TerminalSecretKey,
};
use encrypted_textbox::{EncryptedOutput, InputControl, InputControlProps, cipher};

#[derive(Parser)]
#[command(name = "etbox")]
#[command(version)]
#[command(about = "Encrypt form input with a password-derived AES-256-CBC key.", long_about = None)]
struct Cli {
    /// Read the secret key from this file (one trailing newline is ignored)
    #[arg(long, global = true, value_name = "FILE", conflicts_with = "secret_key_env")]
    secret_key_file: Option<PathBuf>,

    /// Read the secret key from this environment variable
    #[arg(long, global = true, value_name = "VAR")]
    secret_key_env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt the given text, or each line of stdin, printing one JSON record per input
    #[command(alias = "e")]
    Encrypt {
        /// Text to encrypt instead of reading lines from stdin
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Replay text one character at a time through the input control,
    /// printing the record delivered to the change callback after every keystroke
    #[command(alias = "t")]
    Type {
        /// Text to type instead of reading all of stdin
        #[arg(short, long)]
        text: Option<String>,

        /// Label shown above the input
        #[arg(short, long, default_value = "Encrypted text")]
        label: String,

        /// Render the input as a password field
        #[arg(long)]
        password: bool,

        /// Render the control as disabled
        #[arg(long)]
        disabled: bool,

        /// Font size in px
        #[arg(long, value_name = "PX")]
        font_size: Option<u32>,

        /// Include the output panel in the final rendering
        #[arg(long)]
        show_output: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ETBOX_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut source = secret_key_source(&cli);

    let result = match cli.command {
        Commands::Encrypt { text } => run_encrypt(text, &mut *source),
        Commands::Type {
            text,
            label,
            password,
            disabled,
            font_size,
            show_output,
        } => {
            let options = TypeOptions {
                label,
                password,
                disabled,
                font_size,
                show_output,
            };
            run_type(text, options, &mut *source)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", error_chain(&e));
        process::exit(1);
    }
}

fn secret_key_source(cli: &Cli) -> Box<dyn SecretKeySource> {
    if let Some(path) = &cli.secret_key_file {
        Box::new(KeyFile(path.clone()))
    } else if let Some(var) = &cli.secret_key_env {
        Box::new(EnvSecretKey::new(var.clone()))
    } else {
        Box::new(TerminalSecretKey::new())
    }
}

/// Opens the key file lazily so a missing file surfaces as a normal error.
struct KeyFile(PathBuf);

impl SecretKeySource for KeyFile {
    fn read_secret_key(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        let file = File::open(&self.0).map_err(|e| {
            let category = if e.kind() == io::ErrorKind::NotFound {
                ErrorCategory::User
            } else {
                ErrorCategory::Internal
            };
            TextboxError::with_kind_and_source(
                category,
                ErrorKind::SecretKeyUnavailable,
                format!("failed to open secret key file {}", self.0.display()),
                e,
            )
        })?;
        ReaderSecretKey::new(Box::new(file)).read_secret_key()
    }
}

fn read_secret_key(source: &mut dyn SecretKeySource) -> Result<Zeroizing<String>> {
    let secret_key = source
        .read_secret_key()
        .map_err(|e| e.with_context("failed to obtain secret key"))?;
    secret::into_string(secret_key)
}

fn run_encrypt(text: Option<String>, source: &mut dyn SecretKeySource) -> Result<()> {
    let secret_key = read_secret_key(source)?;
    let mut stdout = io::stdout().lock();

    match text {
        Some(text) => {
            let out = cipher::encrypt(&text, secret_key.as_bytes())?;
            write_record(&mut stdout, &out)?;
        }
        None => {
            let mut count = 0usize;
            for line in io::stdin().lock().lines() {
                let line = Zeroizing::new(line.map_err(|e| io_error("failed to read stdin", e))?);
                let out = cipher::encrypt(&line, secret_key.as_bytes())?;
                write_record(&mut stdout, &out)?;
                count += 1;
            }
            info!(lines = count, "encrypted stdin");
        }
    }
    Ok(())
}

struct TypeOptions {
    label: String,
    password: bool,
    disabled: bool,
    font_size: Option<u32>,
    show_output: bool,
}

fn run_type(
    text: Option<String>,
    options: TypeOptions,
    source: &mut dyn SecretKeySource,
) -> Result<()> {
    let text = match text {
        Some(text) => Zeroizing::new(text),
        None => {
            let mut buf = Zeroizing::new(String::new());
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| io_error("failed to read stdin", e))?;
            if buf.ends_with('\n') {
                buf.pop();
            }
            buf
        }
    };
    let secret_key = read_secret_key(source)?;

    let delivered: Rc<RefCell<Vec<EncryptedOutput>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = delivered.clone();

    let mut builder = InputControlProps::builder(options.label, secret_key.as_str())
        .password(options.password)
        .disabled(options.disabled)
        .show_output_values(options.show_output)
        .on_change_encrypted(move |out| sink.borrow_mut().push(out.clone()));
    if let Some(px) = options.font_size {
        builder = builder.font_size(px);
    }
    let mut control = InputControl::new(builder.build());

    let mut stdout = io::stdout().lock();
    for (end, ch) in text.char_indices() {
        control.handle_change(&text[..end + ch.len_utf8()])?;
        for out in delivered.borrow_mut().drain(..) {
            write_record(&mut stdout, &out)?;
        }
    }

    eprint!("{}", control.render());
    Ok(())
}

fn write_record(out: &mut impl Write, record: &EncryptedOutput) -> Result<()> {
    let json = record.to_json()?;
    writeln!(out, "{}", json).map_err(|e| io_error("failed to write stdout", e))
}

fn io_error(msg: &str, e: io::Error) -> TextboxError {
    TextboxError::with_kind_and_source(ErrorCategory::Internal, ErrorKind::Io, msg, e)
}

fn error_chain(err: &TextboxError) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = StdError::source(err);
    while let Some(e) = current {
        parts.push(e.to_string());
        current = e.source();
    }
    parts.join(": ")
}
