#![forbid(unsafe_code)]

mod author;
mod cmd;
mod output;
mod validate;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use scope42_core::config::load_user_config;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "scope42: track architecture issues, risks, improvements and decisions",
    long_about = None
)]
struct Cli {
    /// Enable debug logging for scope42 crates.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format. Defaults to pretty on a terminal, text when piped.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Workspace root. Defaults to the nearest directory containing scope42.yml.
    #[arg(long, global = true, value_name = "DIR")]
    workspace: Option<PathBuf>,

    /// Use the built-in demo workspace. Nothing is saved.
    #[arg(long, global = true, conflicts_with = "workspace")]
    demo: bool,

    /// Comment author (overrides SCOPE42_AUTHOR and the user config).
    #[arg(long, global = true)]
    author: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Workspace",
        about = "Create a workspace",
        long_about = "Create scope42.yml, README.md and the items/ layout, then load the workspace.",
        after_help = "EXAMPLES:\n    # Initialize the current directory\n    scope42 init\n\n    # Initialize a subdirectory\n    scope42 init docs/architecture"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Items",
        about = "Create an item",
        long_about = "Create an issue, risk, improvement or decision. The ID is the next free serial of its type.",
        after_help = "EXAMPLES:\n    # Record an issue\n    scope42 create issue --title \"Checkout page loads slowly\" --tag performance\n\n    # An improvement solving it\n    scope42 create improvement --title \"Cache prices\" --ref issue-1\n\n    # A decision with deciders\n    scope42 create decision --title \"Use Redis\" --decider Alice --decider Bob"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Items",
        about = "Change an item",
        after_help = "EXAMPLES:\n    # Resolve an issue\n    scope42 update issue-1 --status resolved\n\n    # Retag\n    scope42 update risk-2 --add-tag payments --remove-tag testing"
    )]
    Update(cmd::update::UpdateArgs),

    #[command(
        next_help_heading = "Items",
        about = "Comment on an item",
        after_help = "EXAMPLES:\n    scope42 comment risk-1 \"Seen again during the spring sale\"\n\n    # Explicit author\n    scope42 --author Alice comment risk-1 \"Mitigation scheduled\""
    )]
    Comment(cmd::comment::CommentArgs),

    #[command(
        next_help_heading = "Items",
        about = "Reference one item from another",
        long_about = "Add a reference from <FROM> to <TO>. The relation (causes, solves, modifies, supersedes) follows from the two types.",
        after_help = "EXAMPLES:\n    # improvement-2 solves issue-4\n    scope42 link improvement-2 issue-4\n\n    # decision-5 supersedes decision-1\n    scope42 link decision-5 decision-1"
    )]
    Link(cmd::link::LinkArgs),

    #[command(
        next_help_heading = "Read",
        about = "List items",
        after_help = "EXAMPLES:\n    scope42 list --kind risk --status current\n\n    scope42 list --tag performance --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one item with its relations",
        after_help = "EXAMPLES:\n    scope42 show decision-2"
    )]
    Show(cmd::show::ShowArgs),

    #[command(next_help_heading = "Read", about = "List all tags")]
    Tags,

    #[command(
        next_help_heading = "Read",
        about = "List comment authors and deciders"
    )]
    People,

    #[command(
        next_help_heading = "Read",
        about = "Derive the relationship graph",
        long_about = "Derive nodes and labeled edges around the given items, or the whole workspace.",
        after_help = "EXAMPLES:\n    # Everything around improvement-1, as JSON with positions\n    scope42 graph improvement-1 --related --layout radial --json\n\n    # Render the whole workspace with Graphviz\n    scope42 graph --dot | dot -Tsvg > graph.svg"
    )]
    Graph(cmd::graph::GraphArgs),

    #[command(
        next_help_heading = "Read",
        about = "Full-text search",
        after_help = "EXAMPLES:\n    scope42 search \"session store\"\n\n    scope42 search cach -n 3 --json"
    )]
    Search(cmd::search::SearchArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    scope42 completions bash > ~/.local/share/bash-completion/completions/scope42"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SCOPE42_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "scope42=debug,info"
        } else {
            "scope42=info,warn"
        })
    });

    let format = env::var("SCOPE42_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let user_config = load_user_config().unwrap_or_else(|err| {
        warn!(error = %err, "ignoring unreadable user config");
        scope42_core::config::UserConfig::default()
    });

    let ctx = cmd::Context {
        output: output::resolve_output_mode(cli.format, cli.json, user_config.output.as_deref()),
        workspace: cli.workspace.clone(),
        demo: cli.demo,
        author: cli.author.clone(),
        config_author: user_config.author,
        cwd: env::current_dir()?,
    };
    debug!(output = ?ctx.output, demo = ctx.demo, "resolved context");

    match &cli.command {
        Commands::Init(args) => cmd::init::run_init(args, &ctx),
        Commands::Create(args) => cmd::create::run_create(args, &ctx),
        Commands::Update(args) => cmd::update::run_update(args, &ctx),
        Commands::Comment(args) => cmd::comment::run_comment(args, &ctx),
        Commands::Link(args) => cmd::link::run_link(args, &ctx),
        Commands::List(args) => cmd::list::run_list(args, &ctx),
        Commands::Show(args) => cmd::show::run_show(args, &ctx),
        Commands::Tags => cmd::tags::run_tags(&ctx),
        Commands::People => cmd::people::run_people(&ctx),
        Commands::Graph(args) => cmd::graph::run_graph(args, &ctx),
        Commands::Search(args) => cmd::search::run_search(args, &ctx),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
