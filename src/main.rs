//! keysign - key generation, signing and verification utility
//!
//! Usage:
//!   keysign genkey 1024 private.key public.key
//!   keysign sign release.tar.gz private.key > release.sig
//!   keysign verify release.tar.gz release.sig public.key
//!
//! Exit status: 0 on success, 1 on a usage error or an invalid signature,
//! 2 on any other failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use keysign::{ConversionRequest, Direction, Error, KeyKind};

mod commands;

use commands::Outcome;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log to stderr; repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "snake_case")]
enum Command {
    /// Create a key pair with the given modulus size
    Genkey {
        #[arg(value_parser = clap::value_parser!(u32).range(512..=1024))]
        bits: u32,
        private_key: PathBuf,
        public_key: PathBuf,
    },
    /// Sign a file, writing the signature to stdout
    Sign { file: PathBuf, private_key: PathBuf },
    /// Sign a string, writing the signature to stdout
    SignString { text: String, private_key: PathBuf },
    /// Verify a file signature
    Verify {
        file: PathBuf,
        signature: PathBuf,
        public_key: PathBuf,
    },
    /// Verify a string signature
    VerifyString {
        text: String,
        signature: PathBuf,
        public_key: PathBuf,
    },
    /// Encrypt with the private key and decrypt with the public key
    TestCrypt {
        private_key: PathBuf,
        public_key: PathBuf,
    },
    /// Convert a key between hex and PEM (b2o: hex to PEM, o2b: PEM to hex)
    Convkey {
        direction: Direction,
        kind: KeyKind,
        input: PathBuf,
        output: PathBuf,
    },
    /// Convert a signature between hex and raw bytes (b2o: hex to raw, o2b: raw to hex)
    Convsig {
        direction: Direction,
        input: PathBuf,
        output: PathBuf,
    },
    /// Verify a signature against a directory of trusted public keys
    CertVerify {
        file: PathBuf,
        signature: PathBuf,
        cert_dir: PathBuf,
        ca_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(usage_status(&e));
        }
    };

    init_tracing(args.verbose);

    let result = match args.command {
        Command::Genkey {
            bits,
            private_key,
            public_key,
        } => commands::genkey(bits, &private_key, &public_key),
        Command::Sign { file, private_key } => commands::sign(&file, &private_key),
        Command::SignString { text, private_key } => commands::sign_string(&text, &private_key),
        Command::Verify {
            file,
            signature,
            public_key,
        } => commands::verify(&file, &signature, &public_key),
        Command::VerifyString {
            text,
            signature,
            public_key,
        } => commands::verify_string(&text, &signature, &public_key),
        Command::TestCrypt {
            private_key,
            public_key,
        } => commands::test_crypt(&private_key, &public_key),
        Command::Convkey {
            direction,
            kind,
            input,
            output,
        } => commands::convkey(ConversionRequest::new(direction, kind), &input, &output),
        Command::Convsig {
            direction,
            input,
            output,
        } => commands::convsig(direction, &input, &output),
        Command::CertVerify {
            file,
            signature,
            cert_dir,
            ca_dir,
        } => commands::cert_verify(&file, &signature, &cert_dir, &ca_dir),
    };

    ExitCode::from(exit_status(result))
}

/// `--help` and `--version` exit cleanly; every other parse failure is a
/// usage error.
fn usage_status(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

fn exit_status(result: Result<Outcome, Error>) -> u8 {
    match result {
        Ok(Outcome::Success) => 0,
        Ok(Outcome::Rejected) => 1,
        Err(e) => {
            eprintln!("{}", diagnostic(&e));
            2
        }
    }
}

fn diagnostic(err: &Error) -> String {
    format!("Error: {}", err)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::default().add_directive(level.into()))
        .init();
}
