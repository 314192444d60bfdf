//! protoc-gen-checker - fails a protoc build when messages or enums are unused.
//!
//! Two modes:
//! - Plugin mode (default): run by protoc as `--checker_out`. Reads a
//!   `CodeGeneratorRequest` from stdin, writes a `CodeGeneratorResponse` to
//!   stdout on success, prints the report to stderr and exits 1 on failure.
//! - Standalone mode (`--descriptor-set FILE`): checks a descriptor set
//!   written by `protoc --include_imports --descriptor_set_out=FILE`.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use prost::Message as _;
use prost_types::compiler::code_generator_response::Feature;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use protocheck_core::{
    decode_descriptor_set, ensure_language_packages, find_config, init_structured_logging,
    load_config, print_json, print_plain, tree_from_files, type_graph_to_json, build_type_graph,
    reachable_from_roots, Checker, CheckerConfig, CheckerError, IoResultExt, PackageSource,
    PluginParams,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Detects protobuf messages and enums unreachable from any RPC")]
pub struct Cli {
    /// Check a FileDescriptorSet file instead of reading a plugin request from stdin
    #[arg(long, value_name = "FILE")]
    descriptor_set: Option<PathBuf>,

    /// Package prefixes whose types are never reported
    #[arg(long, num_args = 1..)]
    ignore_package: Vec<String>,

    /// Fully-qualified type names that are never reported
    #[arg(long, num_args = 1..)]
    ignore_message: Vec<String>,

    /// Package source every file must declare: java or proto (go_package by default)
    #[arg(long)]
    language_package: Option<String>,

    /// Path to a protocheck.toml (defaults to ./protocheck.toml if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Write Graphviz DOT output for the type graph to a file
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Write the type graph in visualizer JSON format to a file
    #[arg(long, value_name = "FILE")]
    graph_json: Option<PathBuf>,
}

/// Settings merged from the config file, plugin parameters and CLI flags.
#[derive(Debug, Default)]
struct Settings {
    language_package: PackageSource,
    ignore_packages: Vec<String>,
    ignore_messages: Vec<String>,
    json: bool,
}

impl Settings {
    fn from_config(config: Option<CheckerConfig>) -> Result<Self> {
        let Some(config) = config else {
            return Ok(Self::default());
        };
        Ok(Self {
            language_package: config.package_source()?.unwrap_or_default(),
            json: config.wants_json(),
            ignore_packages: config.ignore_packages.unwrap_or_default(),
            ignore_messages: config.ignore_messages.unwrap_or_default(),
        })
    }

    fn merge_params(&mut self, params: PluginParams) {
        if params.language_package != PackageSource::default() {
            self.language_package = params.language_package;
        }
        self.ignore_packages.extend(params.ignore_packages);
        self.ignore_messages.extend(params.ignore_messages);
    }
}

/// Outcome of processing one plugin request.
#[derive(Debug)]
enum PluginOutcome {
    /// Encoded response to write to stdout
    Accepted(Vec<u8>),
    /// Message to print to stderr before exiting 1
    Rejected(String),
}

/// Runs the check for a serialized `CodeGeneratorRequest`.
fn process_request(input: &[u8], mut settings: Settings) -> PluginOutcome {
    let request = match CodeGeneratorRequest::decode(input) {
        Ok(request) => request,
        Err(e) => return PluginOutcome::Rejected(CheckerError::decode("request", e).to_string()),
    };
    match PluginParams::parse(request.parameter()) {
        Ok(params) => settings.merge_params(params),
        Err(e) => return PluginOutcome::Rejected(e.to_string()),
    }
    if let Err(e) = ensure_language_packages(&request.proto_file, settings.language_package) {
        return PluginOutcome::Rejected(e.to_string());
    }

    let tree = tree_from_files(&request.proto_file);
    let result = Checker::new(&tree)
        .ignore_packages(settings.ignore_packages)
        .ignore_messages(settings.ignore_messages)
        .check();

    match result {
        Ok(()) => {
            let response = CodeGeneratorResponse {
                supported_features: Some(Feature::Proto3Optional as u64),
                ..Default::default()
            };
            PluginOutcome::Accepted(response.encode_to_vec())
        }
        Err(unused) => PluginOutcome::Rejected(unused.to_string()),
    }
}

fn run_plugin(settings: Settings) -> Result<i32> {
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read plugin request from stdin")?;

    match process_request(&input, settings) {
        PluginOutcome::Accepted(response) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&response).context("Failed to write plugin response")?;
            stdout.flush()?;
            Ok(0)
        }
        PluginOutcome::Rejected(message) => {
            eprintln!("{}", message);
            Ok(1)
        }
    }
}

fn run_standalone(path: &Path, cli: &Cli, settings: Settings) -> Result<i32> {
    let bytes = fs::read(path).with_path(path)?;
    let set = decode_descriptor_set(&bytes)?;
    ensure_language_packages(&set.file, settings.language_package)?;

    let tree = tree_from_files(&set.file);
    let analysis = Checker::new(&tree)
        .ignore_packages(settings.ignore_packages)
        .ignore_messages(settings.ignore_messages)
        .analyze();

    if let Some(dot_path) = &cli.dot {
        write_output(dot_path, &protocheck_core::generate_dot(&tree, &analysis.reachable))?;
    }
    if let Some(graph_path) = &cli.graph_json {
        let graph = build_type_graph(&tree);
        let reachable = reachable_from_roots(&graph, tree.roots());
        let json = type_graph_to_json(&tree, &graph, &reachable);
        write_output(graph_path, &serde_json::to_string_pretty(&json)?)?;
    }

    if settings.json {
        print_json(&analysis);
    } else {
        print_plain(&analysis);
    }

    Ok(if analysis.has_unused() { 1 } else { 0 })
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(anyhow!("Output path is empty"));
    }
    fs::write(path, content).with_path(path)?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let config = match &cli.config {
        Some(path) => Some(load_config(path)?),
        None => find_config(Path::new("."))?,
    };
    let mut settings = Settings::from_config(config)?;
    if let Some(language) = &cli.language_package {
        settings.language_package = PackageSource::from_param(language)?;
    }
    settings.ignore_packages.extend(cli.ignore_package.iter().cloned());
    settings.ignore_messages.extend(cli.ignore_message.iter().cloned());
    settings.json |= cli.json;
    Ok(settings)
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] protoc-gen-checker internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
        std::process::exit(2);
    }));

    init_structured_logging();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    let code = match &cli.descriptor_set {
        Some(path) => run_standalone(path, &cli, settings)?,
        None => run_plugin(settings)?,
    };
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::{
        DescriptorProto, FileDescriptorProto, FileDescriptorSet, FileOptions,
        MethodDescriptorProto, ServiceDescriptorProto,
    };
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join("protocheck_cli_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn message(name: &str) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn api_file(extra: &[&str], go_package: Option<&str>) -> FileDescriptorProto {
        let mut messages = vec![message("Req"), message("Resp")];
        messages.extend(extra.iter().map(|m| message(m)));
        FileDescriptorProto {
            name: Some("test/api.proto".to_string()),
            package: Some("test".to_string()),
            message_type: messages,
            service: vec![ServiceDescriptorProto {
                name: Some("Api".to_string()),
                method: vec![MethodDescriptorProto {
                    name: Some("Call".to_string()),
                    input_type: Some(".test.Req".to_string()),
                    output_type: Some(".test.Resp".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            options: Some(FileOptions {
                go_package: go_package.map(String::from),
                java_package: Some("com.example.test".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn request(parameter: Option<&str>, extra: &[&str], go_package: Option<&str>) -> Vec<u8> {
        CodeGeneratorRequest {
            file_to_generate: vec!["test/api.proto".to_string()],
            parameter: parameter.map(String::from),
            proto_file: vec![api_file(extra, go_package)],
            ..Default::default()
        }
        .encode_to_vec()
    }

    fn rejected(outcome: PluginOutcome) -> String {
        match outcome {
            PluginOutcome::Rejected(message) => message,
            PluginOutcome::Accepted(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_accepts_clean_schema() {
        let input = request(None, &[], Some("example.com/test"));
        match process_request(&input, Settings::default()) {
            PluginOutcome::Accepted(bytes) => {
                let response = CodeGeneratorResponse::decode(bytes.as_slice()).unwrap();
                assert!(response.error.is_none());
                assert!(response.file.is_empty());
                assert_eq!(
                    response.supported_features,
                    Some(Feature::Proto3Optional as u64)
                );
            }
            PluginOutcome::Rejected(message) => panic!("unexpected rejection: {}", message),
        }
    }

    #[test]
    fn test_rejects_unused_types() {
        let input = request(None, &["Unused", "Other"], Some("example.com/test"));
        assert_eq!(
            rejected(process_request(&input, Settings::default())),
            "unused message: 'test.Unused'\nunused message: 'test.Other'"
        );
    }

    #[test]
    fn test_parameters_filter_report() {
        let input = request(
            Some("ignore_message=test.Unused,Mtest/api.proto=example.com/test"),
            &["Unused", "Other"],
            Some("example.com/test"),
        );
        assert_eq!(
            rejected(process_request(&input, Settings::default())),
            "unused message: 'test.Other'"
        );

        let input = request(Some("ignore_package=test"), &["Unused"], Some("x"));
        assert!(matches!(
            process_request(&input, Settings::default()),
            PluginOutcome::Accepted(_)
        ));
    }

    #[test]
    fn test_missing_go_package() {
        let input = request(None, &[], None);
        assert_eq!(
            rejected(process_request(&input, Settings::default())),
            "go_package is not found for test/api.proto. Set go_package or use language_package param"
        );

        let input = request(Some("language_package=java"), &[], None);
        assert!(matches!(
            process_request(&input, Settings::default()),
            PluginOutcome::Accepted(_)
        ));
    }

    #[test]
    fn test_unsupported_language_package() {
        let input = request(Some("language_package=rust"), &[], Some("x"));
        assert_eq!(
            rejected(process_request(&input, Settings::default())),
            "unsupported language_package param. Should be one of: java, proto"
        );
    }

    #[test]
    fn test_garbage_input() {
        let message = rejected(process_request(&[0xff, 0xff, 0xff], Settings::default()));
        assert!(message.starts_with("failed to unmarshal request"));
    }

    #[test]
    fn test_settings_merge() {
        let mut settings = Settings {
            ignore_packages: vec!["google".to_string()],
            ..Default::default()
        };
        settings.merge_params(PluginParams::parse("ignore_package=grpc,language_package=proto").unwrap());
        assert_eq!(settings.ignore_packages, vec!["google", "grpc"]);
        assert_eq!(settings.language_package, PackageSource::Proto);

        settings.merge_params(PluginParams::default());
        assert_eq!(settings.language_package, PackageSource::Proto);
    }

    #[test]
    fn test_settings_from_config() {
        let config = CheckerConfig {
            ignore_messages: Some(vec!["a.B".to_string()]),
            language_package: Some("java".to_string()),
            ..Default::default()
        };
        let settings = Settings::from_config(Some(config)).unwrap();
        assert_eq!(settings.ignore_messages, vec!["a.B"]);
        assert_eq!(settings.language_package, PackageSource::Java);
        assert!(!settings.json);
    }

    #[test]
    fn test_cli_parse() {
        let cli = Cli::parse_from([
            "protoc-gen-checker",
            "--descriptor-set",
            "set.pb",
            "--ignore-package",
            "google",
            "grpc",
            "--json",
        ]);
        assert_eq!(cli.descriptor_set, Some(PathBuf::from("set.pb")));
        assert_eq!(cli.ignore_package, vec!["google", "grpc"]);
        assert!(cli.json);
    }

    fn write_descriptor_set(dir: &Path, extra: &[&str]) -> PathBuf {
        let path = dir.join("set.pb");
        let set = FileDescriptorSet {
            file: vec![api_file(extra, Some("example.com/test"))],
        };
        fs::write(&path, set.encode_to_vec()).unwrap();
        path
    }

    fn standalone(path: &Path, args: &[&str]) -> Result<i32> {
        let path_arg = path.to_string_lossy().into_owned();
        let mut argv = vec!["protoc-gen-checker", "--descriptor-set", path_arg.as_str()];
        argv.extend_from_slice(args);
        let cli = Cli::parse_from(argv);
        let settings = Settings {
            ignore_packages: cli.ignore_package.clone(),
            ignore_messages: cli.ignore_message.clone(),
            ..Default::default()
        };
        run_standalone(path, &cli, settings)
    }

    #[test]
    fn test_standalone_exit_codes() {
        let dir = create_temp_dir("exit_codes");
        let clean = write_descriptor_set(&dir, &[]);
        assert_eq!(standalone(&clean, &[]).unwrap(), 0);

        let dir = create_temp_dir("exit_codes_unused");
        let dirty = write_descriptor_set(&dir, &["Unused"]);
        assert_eq!(standalone(&dirty, &[]).unwrap(), 1);
        assert_eq!(
            standalone(&dirty, &["--ignore-message", "test.Unused"]).unwrap(),
            0
        );
        assert_eq!(standalone(&dirty, &["--ignore-package", "test"]).unwrap(), 0);
    }

    #[test]
    fn test_standalone_writes_graph_outputs() {
        let dir = create_temp_dir("outputs");
        let set = write_descriptor_set(&dir, &["Unused"]);
        let dot_path = dir.join("types.dot");
        let json_path = dir.join("types.json");

        let code = standalone(
            &set,
            &[
                "--dot",
                dot_path.to_str().unwrap(),
                "--graph-json",
                json_path.to_str().unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(code, 1);

        let dot = fs::read_to_string(&dot_path).unwrap();
        assert!(dot.starts_with("digraph protocheck {"));
        assert!(dot.contains("\"test.Unused\" [fillcolor=lightcoral];"));

        let graph: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(graph["stats"]["total_types"].as_u64(), Some(3));
        assert_eq!(graph["stats"]["unused_types"].as_u64(), Some(1));
    }

    #[test]
    fn test_standalone_missing_or_corrupt_set() {
        let dir = create_temp_dir("bad_set");
        let missing = dir.join("absent.pb");
        let err = standalone(&missing, &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CheckerError>(),
            Some(CheckerError::Io { .. })
        ));

        let corrupt = dir.join("corrupt.pb");
        fs::write(&corrupt, [0xff, 0xff, 0xff]).unwrap();
        let err = standalone(&corrupt, &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CheckerError>(),
            Some(CheckerError::Decode { .. })
        ));
    }

    #[test]
    fn test_write_output() {
        let dir = create_temp_dir("write_output");
        let path = dir.join("out.txt");
        write_output(&path, "digraph {}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "digraph {}");

        let err = write_output(Path::new(""), "x").unwrap_err();
        assert_eq!(err.to_string(), "Output path is empty");

        let err = write_output(&dir.join("no_such_dir").join("out.txt"), "x").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CheckerError>(),
            Some(CheckerError::Io { .. })
        ));
    }
}
