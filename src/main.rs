use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use apex_guard::cli::{Cli, ColorChoice, Commands, FixArgs, InitArgs, ScanArgs};
use apex_guard::config::{Config, ConfigLoader, FileConfigLoader};
use apex_guard::fixer::{BackupPolicy, FixReport, Fixer};
use apex_guard::output::{
    AnalysisReport, ColorMode, HtmlFormatter, JsonFormatter, OutputFormat, OutputFormatter,
    TextFormatter,
};
use apex_guard::priority::{Prioritizer, Tier, TierPolicy};
use apex_guard::rules::RuleRegistry;
use apex_guard::scanner::{ApexScanner, GlobFilter};
use apex_guard::verifier::{Verifier, VerifyReport};
use apex_guard::{EXIT_CONFIG_ERROR, EXIT_SUCCESS, EXIT_VIOLATIONS_FOUND};

const fn color_choice_to_mode(choice: ColorChoice) -> ColorMode {
    match choice {
        ColorChoice::Auto => ColorMode::Auto,
        ColorChoice::Always => ColorMode::Always,
        ColorChoice::Never => ColorMode::Never,
    }
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match &cli.command {
        Commands::Scan(args) => run_scan(args, &cli),
        Commands::Fix(args) => run_fix(args, &cli),
        Commands::Init(args) => run_init(args),
    };

    std::process::exit(exit_code);
}

fn run_scan(args: &ScanArgs, cli: &Cli) -> i32 {
    match run_scan_impl(args, cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

fn run_scan_impl(args: &ScanArgs, cli: &Cli) -> apex_guard::Result<i32> {
    let config = load_config(args.config.as_deref(), cli.no_config)?;
    let root = resolve_root(&args.path)?;

    let scanner = build_scanner(args, &config)?;
    let scan = scanner.scan(&root)?;

    let policy = tier_policy_from_config(&config);
    let prioritized = Prioritizer::new(policy).prioritize(&scan);

    let report = AnalysisReport {
        scan: &scan,
        prioritized: &prioritized,
        fix: None,
        verify: None,
    };
    emit_report(args, cli, &report)?;

    if scan.total_violations() > 0 {
        Ok(EXIT_VIOLATIONS_FOUND)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

fn run_fix(args: &FixArgs, cli: &Cli) -> i32 {
    match run_fix_impl(args, cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

fn run_fix_impl(args: &FixArgs, cli: &Cli) -> apex_guard::Result<i32> {
    let config = load_config(args.scan.config.as_deref(), cli.no_config)?;
    let root = resolve_root(&args.scan.path)?;

    let backup_policy = if args.clean_backups {
        BackupPolicy::CleanOnSuccess
    } else {
        config.fix.backup_policy
    };

    let scanner = build_scanner(&args.scan, &config)?;
    let scan = scanner.scan(&root)?;

    let policy = tier_policy_from_config(&config);
    let prioritized = Prioritizer::new(policy.clone()).prioritize(&scan);

    let (fix_report, verify_report) = if scan.total_violations() == 0 {
        (FixReport::default(), VerifyReport::default())
    } else {
        let fix_report = Fixer::new(policy).fix(&scan.violations);

        // Verification needs its own scanner so the re-scan observes the
        // mutated files with identical settings.
        let verifier = Verifier::new(build_scanner(&args.scan, &config)?, root, backup_policy);
        let verify_report = verifier.verify(&scan, &fix_report)?;
        (fix_report, verify_report)
    };

    let report = AnalysisReport {
        scan: &scan,
        prioritized: &prioritized,
        fix: Some(&fix_report),
        verify: Some(&verify_report),
    };
    emit_report(&args.scan, cli, &report)?;

    let remaining = scan
        .total_violations()
        .saturating_sub(fix_report.fixed_count());
    if remaining > 0 {
        Ok(EXIT_VIOLATIONS_FOUND)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

fn load_config(config_path: Option<&Path>, no_config: bool) -> apex_guard::Result<Config> {
    if no_config {
        return Ok(Config::default());
    }

    let loader = FileConfigLoader::new();
    config_path.map_or_else(|| loader.load(), |path| loader.load_from_path(path))
}

fn resolve_root(path: &Path) -> apex_guard::Result<PathBuf> {
    if !path.exists() {
        return Err(apex_guard::ApexGuardError::Config(format!(
            "Target directory not found: {}",
            path.display()
        )));
    }
    Ok(dunce::canonicalize(path)?)
}

fn build_scanner(args: &ScanArgs, config: &Config) -> apex_guard::Result<ApexScanner<GlobFilter>> {
    let extensions = args
        .ext
        .clone()
        .unwrap_or_else(|| config.scan.extensions.clone());
    let mut exclude_patterns = config.exclude.patterns.clone();
    exclude_patterns.extend(args.exclude.clone());
    let filter = GlobFilter::new(extensions, &exclude_patterns)?;

    let threshold = args
        .complexity_threshold
        .unwrap_or(config.scan.complexity_threshold);
    let registry = RuleRegistry::with_complexity_threshold(threshold);

    let include_test_code = config.scan.include_test_code && !args.no_test_code;

    Ok(ApexScanner::new(registry, filter)
        .with_test_code(include_test_code)
        .with_gitignore(config.scan.use_gitignore))
}

fn tier_policy_from_config(config: &Config) -> TierPolicy {
    TierPolicy::default()
        .with_fix_mode(Tier::Critical, config.fix.critical)
        .with_fix_mode(Tier::Important, config.fix.important)
        .with_fix_mode(Tier::Cleanup, config.fix.cleanup)
}

fn emit_report(args: &ScanArgs, cli: &Cli, report: &AnalysisReport<'_>) -> apex_guard::Result<()> {
    let color_mode = color_choice_to_mode(cli.color);
    let output = match args.format {
        OutputFormat::Text => TextFormatter::with_verbose(color_mode, cli.verbose).format(report),
        OutputFormat::Json => JsonFormatter.format(report),
        OutputFormat::Html => HtmlFormatter.format(report),
    }?;

    write_output(args.output.as_deref(), &output, cli.quiet)?;

    if !cli.quiet {
        for warning in &report.scan.warnings {
            eprintln!("Warning: {warning}");
        }
    }
    Ok(())
}

fn write_output(output_path: Option<&Path>, content: &str, quiet: bool) -> apex_guard::Result<()> {
    if let Some(path) = output_path {
        fs::write(path, content)?;
    } else if !quiet {
        print!("{content}");
    }
    Ok(())
}

fn run_init(args: &InitArgs) -> i32 {
    match run_init_impl(args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

fn run_init_impl(args: &InitArgs) -> apex_guard::Result<()> {
    let output_path = &args.output;

    if output_path.exists() && !args.force {
        return Err(apex_guard::ApexGuardError::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }

    fs::write(output_path, generate_config_template())?;

    println!("Created configuration file: {}", output_path.display());
    Ok(())
}

fn generate_config_template() -> String {
    r#"# apex-guard configuration file

[scan]
# File extensions treated as Apex source
extensions = ["cls", "trigger"]

# Scan files classified as test code (findings in test code are
# reported but never auto-fixed)
include_test_code = true

# Respect .gitignore rules while walking
use_gitignore = false

# Cognitive complexity score above which methods are flagged
complexity_threshold = 15

# Exclude patterns (glob syntax)
[exclude]
patterns = [
    "**/node_modules/**",
    "**/.sfdx/**",
]

[fix]
# Per-tier auto-fix policy: "never", "conditional", or "always"
critical = "conditional"
important = "never"
cleanup = "always"

# What happens to .backup files once a fix passes verification:
# "retain" keeps them as an audit trail, "clean-on-success" deletes them
backup_policy = "retain"
"#
    .to_string()
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
