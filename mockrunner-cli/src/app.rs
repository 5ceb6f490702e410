use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// mockrunner - write, inspect and check method mocking rule sets
#[derive(Debug, Parser)]
#[command(name = "mockrunner", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Identifies the method a spec applies to.
#[derive(Debug, Args)]
pub struct MethodTarget {
    /// Fully qualified declaring class (e.g., svc.Store).
    #[arg(short, long = "class", value_name = "CLASS")]
    pub class_name: String,

    /// Method name (e.g., getCount).
    #[arg(short, long = "method", value_name = "METHOD")]
    pub method_name: String,

    /// Parameter list as displayed (e.g., "(int)").
    #[arg(short, long, default_value = "")]
    pub signature: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the rules in a rule-set file.
    Show {
        /// Path to the rule-set file.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Load a rule set strictly and trial-coerce every mock value.
    Check {
        /// Path to the rule-set file.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Add or replace a method spec and save the file (created if missing).
    Add {
        /// Path to the rule-set file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        #[command(flatten)]
        target: MethodTarget,

        /// Mock return value as text (JSON for lists and objects).
        #[arg(long)]
        value: Option<String>,

        /// Return type descriptor (e.g., int, List<svc.Item>). Inferred if omitted.
        #[arg(short = 't', long = "type", default_value = "")]
        return_type: String,

        /// Throw an exception instead of returning a value.
        #[arg(long)]
        throw: bool,

        /// Exception type to throw.
        #[arg(long, default_value = "java.lang.RuntimeException")]
        exception_type: String,

        /// Exception message.
        #[arg(long, default_value = "Mocked exception")]
        message: String,

        /// Save the spec disabled.
        #[arg(long)]
        disabled: bool,
    },

    /// Remove a method spec and save the file.
    Remove {
        /// Path to the rule-set file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        #[command(flatten)]
        target: MethodTarget,
    },

    /// Coerce a value against a type descriptor and print the result.
    Coerce {
        /// Return type descriptor.
        #[arg(short = 't', long = "type")]
        return_type: String,

        /// Mock value as text. Omit for null.
        value: Option<String>,
    },

    /// Print a sample mock value for a type descriptor.
    Sample {
        /// Return type descriptor.
        #[arg(short = 't', long = "type")]
        return_type: String,
    },
}
