use certification::config::{AppConfig, LetterFormat};
use certification::error::AppError;
use certification::telemetry;
use certification::workflows::letters::{
    JsonLetterRenderer, LetterRenderer, TemplateLetterRenderer,
};
use certification::workflows::pipeline::{CertificationPipeline, Evaluation, RunSummary};
use certification::workflows::roster::ClassifiedEmployee;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "certification-letters",
    about = "Score an employee roster and write certification letters for those who passed",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load, clean, score and classify the roster, then write letters (default command)
    Run(RunArgs),
    /// Print the classified roster without writing any letters
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Roster CSV export (overrides CERT_INPUT)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Folder receiving the letters (overrides CERT_OUTPUT_DIR)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Letter template with «Placeholder» fields (overrides CERT_TEMPLATE)
    #[arg(long)]
    template: Option<PathBuf>,
    /// Letter format: text or json (overrides CERT_FORMAT)
    #[arg(long, value_parser = parse_format)]
    format: Option<LetterFormat>,
}

#[derive(Args, Debug, Default)]
struct CheckArgs {
    /// Roster CSV export (overrides CERT_INPUT)
    #[arg(long)]
    input: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Run(RunArgs::default()));

    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Run(args) => {
            apply_run_overrides(&mut config, args);
            run_batch(&config)
        }
        Command::Check(args) => {
            if let Some(input) = args.input {
                config.roster.input = input;
            }
            run_check(&config);
            Ok(())
        }
    }
}

fn parse_format(raw: &str) -> Result<LetterFormat, String> {
    LetterFormat::parse(raw).map_err(|err| err.to_string())
}

fn apply_run_overrides(config: &mut AppConfig, args: RunArgs) {
    let RunArgs {
        input,
        output,
        template,
        format,
    } = args;

    if let Some(input) = input {
        config.roster.input = input;
    }
    if let Some(output) = output {
        config.letters.output_dir = output;
    }
    if template.is_some() {
        config.letters.template = template;
    }
    if let Some(format) = format {
        config.letters.format = format;
    }
}

fn build_renderer(config: &AppConfig) -> Result<Box<dyn LetterRenderer>, AppError> {
    let output_dir = config.letters.output_dir.clone();
    let renderer: Box<dyn LetterRenderer> = match (config.letters.format, &config.letters.template)
    {
        (LetterFormat::Json, _) => Box::new(JsonLetterRenderer::new(output_dir)),
        (LetterFormat::Text, Some(template)) => Box::new(TemplateLetterRenderer::from_template_file(
            output_dir, template,
        )?),
        (LetterFormat::Text, None) => Box::new(TemplateLetterRenderer::new(output_dir)),
    };
    Ok(renderer)
}

fn run_batch(config: &AppConfig) -> Result<(), AppError> {
    let renderer = build_renderer(config)?;
    let pipeline = CertificationPipeline::new(renderer);

    info!(?config.environment, input = %config.roster.input.display(), "certification run started");
    println!("Loading roster from {}", config.roster.input.display());
    let evaluation = Evaluation::from_path(&config.roster.input);
    render_evaluation(&evaluation);

    println!(
        "\nGenerating letters in {}",
        config.letters.output_dir.display()
    );
    let summary = pipeline.run_evaluation(evaluation)?;
    render_letters(&summary);
    render_totals(&summary.evaluation);

    println!("\nProcessing complete");
    Ok(())
}

fn run_check(config: &AppConfig) {
    println!("Loading roster from {}", config.roster.input.display());
    let evaluation = Evaluation::from_path(&config.roster.input);
    render_evaluation(&evaluation);
    render_totals(&evaluation);
    println!("\nProcessing complete");
}

fn render_evaluation(evaluation: &Evaluation) {
    if let Some(error) = &evaluation.source_error {
        println!("Roster could not be read completely: {error}");
    }
    println!(
        "Loaded {} employees ({} rows skipped)",
        evaluation.loaded,
        evaluation.skipped.len()
    );
    println!("Removed {} duplicate records", evaluation.duplicates);

    if evaluation.employees.is_empty() {
        println!("\nResults: none");
        return;
    }

    println!("\nResults");
    for employee in &evaluation.employees {
        println!("- {}", employee_line(employee));
    }
}

fn render_letters(summary: &RunSummary) {
    if summary.documents.is_empty() && summary.failures.is_empty() {
        println!("- no eligible employees");
    }
    for letter in &summary.documents {
        println!("- Generated: {}", letter.path.display());
    }
    for failure in &summary.failures {
        println!("- Failed: {} ({})", failure.full_name, failure.error);
    }
}

fn render_totals(evaluation: &Evaluation) {
    let totals: Vec<String> = evaluation
        .outcome_counts()
        .into_iter()
        .map(|(outcome, count)| format!("{outcome} {count}"))
        .collect();
    println!("\nSummary: {}", totals.join(", "));
}

fn employee_line(employee: &ClassifiedEmployee) -> String {
    format!(
        "{} | {} | Score: {:.2} | Status: {}",
        employee.full_name(),
        employee.employee.department,
        employee.final_score,
        employee.outcome
    )
}
