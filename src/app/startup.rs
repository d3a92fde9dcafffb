//! Application startup
//!
//! Wires logging, configuration, the plugin registry and the pipeline
//! together for one CLI invocation and maps the outcome to an exit code.

use crate::app::cli::Args;
use crate::config::api::{discover, Config};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::model::api::{ScanContext, ScanResult};
use crate::pipeline::api::PipelineExecutor;
use crate::plugin::api::PluginRegistry;
use crate::report::api::{exit_code_for, ExitCode, FailOn};
use crate::streaming::api::LogStreamHandler;
use std::path::PathBuf;
use std::sync::Arc;

/// Run the CLI and return the process exit code
pub async fn run(args: Args) -> i32 {
    if let Err(e) = init_logging(&args.logging_options()) {
        eprintln!("Error: {}", e);
        return ExitCode::INVALID_USAGE;
    }
    colored::control::set_override(args.use_color());

    log::info!(
        "lucidshark {} ({}) starting",
        crate::core::version::tool_version(),
        crate::core::version::git_hash()
    );

    let project_root = match resolve_project_root(&args).await {
        Ok(root) => root,
        Err(code) => return code,
    };

    let mut config = match discover(&project_root, args.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            log_error_with_context(&e, "Configuration loading");
            return ExitCode::INVALID_USAGE;
        }
    };
    apply_overrides(&mut config, &args);

    let registry = match PluginRegistry::from_config(&config) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            log_error_with_context(&e, "Plugin registration");
            return ExitCode::INVALID_USAGE;
        }
    };

    let scanner_names = if args.scanners.is_empty() {
        config.enabled_scanner_names()
    } else {
        args.scanners.clone()
    };

    let executor = match PipelineExecutor::new(registry, config.pipeline_config()) {
        Ok(executor) => executor,
        Err(e) => {
            log_error_with_context(&e, "Pipeline setup");
            return ExitCode::INVALID_USAGE;
        }
    };

    let context = build_context(&args, &config, project_root);
    let result = match executor.execute(&scanner_names, context).await {
        Ok(result) => result,
        Err(e) => {
            log_error_with_context(&e, "Pipeline execution");
            return ExitCode::INVALID_USAGE;
        }
    };

    if let Err(code) = print_report(&result) {
        return code;
    }
    exit_code_for(&result, &config.fail_on)
}

async fn resolve_project_root(args: &Args) -> Result<PathBuf, i32> {
    match tokio::fs::canonicalize(&args.project_root).await {
        Ok(root) => Ok(root),
        Err(e) => {
            log::error!(
                "FATAL: Cannot access project root {}: {}",
                args.project_root.display(),
                e
            );
            Err(ExitCode::INVALID_USAGE)
        }
    }
}

/// Command-line flags take precedence over the configuration file
fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(workers) = args.max_workers {
        config.pipeline.max_workers = usize::from(workers);
    }
    if args.sequential {
        config.pipeline.sequential = true;
    }
    if let Some(threshold) = args.fail_on {
        config.fail_on = FailOn::uniform(threshold);
    }
}

fn build_context(args: &Args, config: &Config, project_root: PathBuf) -> ScanContext {
    let paths = args.target_paths(&project_root);
    let mut context = ScanContext::new(project_root)
        .with_paths(paths)
        .with_domains(config.enabled_domains());

    for (plugin_name, options) in config.plugin_options() {
        context = context.with_plugin_config(plugin_name, options);
    }
    if args.stream {
        context = context.with_stream_handler(Arc::new(LogStreamHandler::new(true)));
    }
    context
}

fn print_report(result: &ScanResult) -> Result<(), i32> {
    match result.to_json_pretty() {
        Ok(json) => {
            println!("{}", json);
            Ok(())
        }
        Err(e) => {
            log::error!("FATAL: Failed to serialize scan result: {}", e);
            Err(ExitCode::SCANNER_ERROR)
        }
    }
}
