//! Skylark Android CLI
//!
//! Release signing and build tools for Skylark's Flutter Android app.

use clap::{Parser, Subcommand};
use skylark_android::doctor::{CheckStatus, Doctor};
use skylark_android::gradle;
use skylark_android::project::FlutterProject;
use skylark_android::signing;
use skylark_android::variants::BuildVariantConfig;
use skylark_cli::output::{format_count, format_duration, format_size, mask_secret, Status};
use skylark_core::config::Config;
use skylark_core::error::exit_codes;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "skylark-android")]
#[command(about = "Release signing and build tools for Skylark Android")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the signing configuration
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Show the resolved signing configuration (passwords masked)
    Show {
        /// Also print the keystore's SHA-256 fingerprint
        #[arg(long)]
        fingerprint: bool,
    },

    /// Write a key.properties template
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Build an APK or app bundle
    Build {
        /// Variant: debug, profile, release
        #[arg(long)]
        variant: Option<String>,
        /// Build an app bundle (AAB) instead of an APK
        #[arg(long)]
        bundle: bool,
        /// Clean before building
        #[arg(long)]
        clean: bool,
    },

    /// Print Gradle's signing report for the app module
    Report,

    /// Diagnose the environment and project
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("SKYLARK_LOG").unwrap_or_else(|_| {
        if cli.quiet {
            EnvFilter::new("error")
        } else {
            match cli.verbose {
                0 => EnvFilter::new("warn"),
                1 => EnvFilter::new("skylark_core=debug,skylark_android=debug"),
                _ => EnvFilter::new("skylark_core=trace,skylark_android=trace"),
            }
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let config = match Config::load(cli.config.as_deref().and_then(Path::to_str)) {
        Ok(config) => config,
        Err(e) => {
            Status::failure(&e);
            std::process::exit(e.exit_code());
        }
    };

    let config_check = config.schema.validate();
    if !config_check.is_valid() {
        for error in config_check.errors() {
            Status::error(&format!("config: {}", error));
        }
        std::process::exit(exit_codes::CONFIG_ERROR);
    }

    let exit_code = match cli.command {
        Commands::Check { strict } => run_check(&config, strict),
        Commands::Show { fingerprint } => run_show(&config, fingerprint),
        Commands::Init { force } => run_init(&config, force),
        Commands::Build {
            variant,
            bundle,
            clean,
        } => run_build(&config, variant.as_deref(), bundle, clean),
        Commands::Report => run_report(&config),
        Commands::Doctor { json } => run_doctor(&config, json),
    };

    std::process::exit(exit_code);
}

/// Locate the project, reporting failure in the standard way
fn open_project(config: &Config) -> Result<FlutterProject, i32> {
    let start = std::env::current_dir()
        .map(|cwd| cwd.join(&config.schema.general.project_dir))
        .unwrap_or_else(|_| PathBuf::from(&config.schema.general.project_dir));

    FlutterProject::discover(&start).map_err(|e| {
        Status::failure(&e);
        e.exit_code()
    })
}

fn run_check(config: &Config, strict: bool) -> i32 {
    let project = match open_project(config) {
        Ok(project) => project,
        Err(code) => return code,
    };

    let layout = project.validate_layout();
    if !layout.is_valid() {
        for error in layout.errors() {
            Status::error(&error.to_string());
        }
        return exit_codes::VALIDATION_ERROR;
    }

    let properties_path = project.properties_path(&config.schema.signing.properties_file);
    let mut warnings = 0usize;
    let mut configured_store = None;

    match signing::load_credentials(&properties_path) {
        Err(e) => {
            Status::failure(&e);
            return e.exit_code();
        }
        Ok(None) => {
            Status::warning(&format!(
                "{} not found; release builds will be rejected",
                properties_path.display()
            ));
            warnings += 1;
        }
        Ok(Some(credentials)) => {
            let result = signing::validate(
                &credentials,
                &project.app_dir(),
                config.schema.signing.require_keystore,
            );

            for warning in result.warnings() {
                Status::warning(&warning.to_string());
            }
            warnings += result.warnings().len();

            if !result.is_valid() {
                for error in result.errors() {
                    Status::error(&error.to_string());
                }
                return exit_codes::VALIDATION_ERROR;
            }

            Status::success(&format!(
                "Signing configuration is valid (keyAlias {})",
                credentials.key_alias
            ));
            configured_store = Some(credentials.store_file_path(&project.app_dir()));
        }
    }

    let strays = project.stray_keystores(configured_store.as_deref());
    if !strays.is_empty() {
        Status::warning(&format!(
            "{} in the project tree; make sure they are gitignored",
            format_count(strays.len(), "stray keystore file", "stray keystore files")
        ));
        for keystore in &strays {
            Status::info(&format!("  {}", keystore.display()));
        }
        warnings += 1;
    }

    if strict && warnings > 0 {
        Status::error(&format!(
            "{} in strict mode",
            format_count(warnings, "warning", "warnings")
        ));
        return exit_codes::VALIDATION_ERROR;
    }

    exit_codes::SUCCESS
}

fn run_show(config: &Config, fingerprint: bool) -> i32 {
    let project = match open_project(config) {
        Ok(project) => project,
        Err(code) => return code,
    };

    let properties_path = project.properties_path(&config.schema.signing.properties_file);

    Status::header("Signing Configuration");
    println!("Properties file: {}", properties_path.display());

    let credentials = match signing::load_credentials(&properties_path) {
        Err(e) => {
            Status::failure(&e);
            return e.exit_code();
        }
        Ok(None) => {
            Status::warning("No release credentials configured");
            Status::info("Run 'skylark-android init' to create a template");
            return exit_codes::SUCCESS;
        }
        Ok(Some(credentials)) => credentials,
    };

    println!("  keyAlias:      {}", credentials.key_alias);
    println!("  keyPassword:   {}", mask_secret(&credentials.key_password));
    println!("  storeFile:     {}", credentials.store_file.display());
    println!("  storePassword: {}", mask_secret(&credentials.store_password));

    let keystore = credentials.store_file_path(&project.app_dir());
    match std::fs::metadata(&keystore) {
        Ok(meta) => {
            println!(
                "  keystore:      {} ({})",
                keystore.display(),
                format_size(meta.len())
            );
            if fingerprint {
                match signing::keystore_fingerprint(&keystore) {
                    Ok(digest) => println!("  SHA-256:       {}", digest),
                    Err(e) => {
                        Status::failure(&e);
                        return e.exit_code();
                    }
                }
            }
        }
        Err(_) => {
            Status::warning(&format!("Keystore not found at {}", keystore.display()));
        }
    }

    let variant = BuildVariantConfig::release(Some(credentials));
    Status::subheader("Release Variant");
    println!("  minifyEnabled:   {}", config.schema.build.minify);
    println!("  shrinkResources: {}", config.schema.build.shrink_resources);
    println!("  signed:          {}", variant.is_signed());

    exit_codes::SUCCESS
}

fn run_init(config: &Config, force: bool) -> i32 {
    let project = match open_project(config) {
        Ok(project) => project,
        Err(code) => return code,
    };

    if !project.android_dir().is_dir() {
        Status::error(&format!(
            "No android/ directory under {}",
            project.root().display()
        ));
        return exit_codes::FAILURE;
    }

    let file_name = &config.schema.signing.properties_file;
    let path = project.properties_path(file_name);

    if path.exists() && !force {
        Status::error(&format!(
            "{} already exists; pass --force to overwrite",
            path.display()
        ));
        return exit_codes::FAILURE;
    }

    if let Err(e) = std::fs::write(&path, signing::PROPERTIES_TEMPLATE) {
        Status::error(&format!("Failed to write {}: {}", path.display(), e));
        return exit_codes::FAILURE;
    }

    Status::success(&format!("Wrote {}", path.display()));
    Status::info("Fill in the real credentials before building a release");

    let gitignore = project.android_dir().join(".gitignore");
    if let Ok(content) = std::fs::read_to_string(&gitignore) {
        if !content.lines().any(|line| line.contains(file_name)) {
            Status::warning(&format!("{} is not listed in android/.gitignore", file_name));
        }
    }

    exit_codes::SUCCESS
}

fn run_build(config: &Config, variant: Option<&str>, bundle: bool, clean: bool) -> i32 {
    let project = match open_project(config) {
        Ok(project) => project,
        Err(code) => return code,
    };

    let properties_path = project.properties_path(&config.schema.signing.properties_file);
    let credentials = match signing::load_credentials(&properties_path) {
        Ok(credentials) => credentials,
        Err(e) => {
            Status::failure(&e);
            return e.exit_code();
        }
    };

    let name = variant.unwrap_or(&config.schema.build.default_variant);
    let variant = match BuildVariantConfig::from_config(name, credentials, &config.schema.build) {
        Ok(variant) => variant,
        Err(e) => {
            Status::failure(&e);
            return e.exit_code();
        }
    };

    if let Err(e) = variant.validate() {
        Status::failure(&e);
        return e.exit_code();
    }

    if let Some(credentials) = &variant.signing {
        let result = signing::validate(
            credentials,
            &project.app_dir(),
            config.schema.signing.require_keystore,
        );
        for warning in result.warnings() {
            Status::warning(&warning.to_string());
        }
        if !result.is_valid() {
            for error in result.errors() {
                Status::error(&error.to_string());
            }
            return exit_codes::VALIDATION_ERROR;
        }
    }

    let android_dir = project.android_dir();
    let total = if clean { 2 } else { 1 };

    if clean {
        Status::step(1, total, "Cleaning previous build output");
        match gradle::clean(&android_dir) {
            Ok(0) => {}
            Ok(code) => {
                Status::error(&format!("Gradle clean exited with status {}", code));
                return exit_codes::BUILD_ERROR;
            }
            Err(e) => {
                Status::failure(&e);
                return e.exit_code();
            }
        }
    }

    let task = if bundle {
        variant.bundle_task()
    } else {
        variant.assemble_task()
    };
    Status::step(total, total, &format!("Running {}", task));

    let start = Instant::now();
    match gradle::run_task_streaming(&android_dir, &task) {
        Ok(0) => {
            Status::success(&format!(
                "{} finished in {}",
                task,
                format_duration(start.elapsed())
            ));
            exit_codes::SUCCESS
        }
        Ok(code) => {
            Status::error(&format!("Gradle exited with status {}", code));
            exit_codes::BUILD_ERROR
        }
        Err(e) => {
            Status::failure(&e);
            e.exit_code()
        }
    }
}

fn run_report(config: &Config) -> i32 {
    let project = match open_project(config) {
        Ok(project) => project,
        Err(code) => return code,
    };

    match gradle::signing_report(&project.android_dir()) {
        Ok(result) if result.success => {
            print!("{}", result.stdout);
            exit_codes::SUCCESS
        }
        Ok(result) => {
            Status::error("Gradle signingReport failed");
            eprint!("{}", result.combined_output());
            exit_codes::BUILD_ERROR
        }
        Err(e) => {
            Status::failure(&e);
            e.exit_code()
        }
    }
}

fn run_doctor(config: &Config, json: bool) -> i32 {
    let project = match open_project(config) {
        Ok(project) => project,
        Err(code) => return code,
    };

    let report = Doctor::standard(&project, &config.schema).run();

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                Status::error(&format!("Failed to render report: {}", e));
                return exit_codes::FAILURE;
            }
        }
        return if report.is_ready() {
            exit_codes::SUCCESS
        } else {
            exit_codes::FAILURE
        };
    }

    Status::header("Skylark Doctor");

    for check in &report.checks {
        let label = match &check.message {
            Some(message) => format!("{}: {}", check.name, message),
            None => {
                let mut details: Vec<String> = check
                    .details
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                details.sort();
                if details.is_empty() {
                    check.name.clone()
                } else {
                    format!("{} ({})", check.name, details.join(", "))
                }
            }
        };

        match check.status {
            CheckStatus::Pass => Status::success(&label),
            CheckStatus::Warn => Status::warning(&label),
            CheckStatus::Fail => Status::error(&label),
        }
    }

    println!();
    if report.is_ready() {
        Status::success("Ready for release builds");
        exit_codes::SUCCESS
    } else {
        Status::error(&format!(
            "{} must be fixed before building",
            format_count(
                report
                    .checks
                    .iter()
                    .filter(|c| c.status == CheckStatus::Fail)
                    .count(),
                "check",
                "checks"
            )
        ));
        exit_codes::FAILURE
    }
}
