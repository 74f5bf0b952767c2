use clap::{Parser, Subcommand};
use staticmd::config::{self, GeneratorConfig, Overrides};
use staticmd::navigation::NavigationIndex;
use staticmd::paths::{PathMapper, absolute_clean};
use staticmd::{generate, logging, output, scan, template};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "staticmd")]
#[command(version)]
#[command(about = "Static site and book generator for markdown trees")]
#[command(long_about = "\
Static site and book generator for markdown trees

Every markdown file (.md .mkd .mkdn .mdown .markdown) under the input
directory becomes an HTML page at the same place under the output directory.
Navigation menus follow the directory layout; an index file in a
subdirectory stands for that directory and gets a table of contents.

  docs/                      public/
  ├── a.md                   ├── a.html
  ├── index.md         →     ├── index.html
  └── guide/                 └── guide/
      ├── index.md               ├── index.html   (table of contents)
      └── install.md             └── install.html

With --book everything is combined into a single public/index.html with
a nested table of contents and anchors for every page.

Settings can also live in staticmd.toml in the input directory; flags win.
Run 'staticmd gen-config' to print a documented config file.")]
struct Cli {
    /// Input directory
    #[arg(short, long, default_value = ".", global = true)]
    input: PathBuf,

    /// Output directory [default: <input>/public]
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Template file (Tera syntax); a built-in template is used otherwise
    #[arg(short, long, global = true)]
    template: Option<PathBuf>,

    /// Combine all pages into a single index.html
    #[arg(short, long, global = true)]
    book: bool,

    /// Use links relative to each page
    #[arg(short, long, global = true)]
    relative: bool,

    /// Maximum parallel render workers [default: CPU cores]
    #[arg(short, long, global = true)]
    jobs: Option<usize>,

    /// Site or document title [default: input directory name]
    #[arg(long, global = true)]
    title: Option<String>,

    /// Version stamped into pages [default: git short hash or timestamp]
    #[arg(long = "build-version", global = true)]
    build_version: Option<String>,

    /// Additional config file, layered over staticmd.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone)]
enum Command {
    /// Render the site (default)
    Build,
    /// List pages and navigation without writing anything
    Check {
        /// Print the navigation menus as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock staticmd.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::setup_logging(cli.debug);

    match cli.command.clone().unwrap_or(Command::Build) {
        Command::Build => {
            let config = resolve_config(&cli)?;
            let output_root = config.output.clone();
            let report = generate::build(config)?;
            output::print_build_output(&report, &output_root);
        }
        Command::Check { json } => {
            let config = resolve_config(&cli)?;
            template::load(&config)?;
            let pages = scan::discover(&config.input)?;
            let mapper = PathMapper::new(&config.input, &config.output, config.relative);
            let nav = NavigationIndex::from_pages(&pages, &mapper);
            if json {
                println!("{}", output::navigation_json(&nav)?);
            } else {
                output::print_check_output(&pages, &nav, &config.input);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Layer stock defaults, config files and flags into the run configuration.
fn resolve_config(cli: &Cli) -> Result<GeneratorConfig, Box<dyn Error>> {
    let input = absolute_clean(&cli.input)?;
    let mut site = config::load_config(&input, cli.config.as_deref())?;
    site.apply(overrides(cli)?);
    Ok(GeneratorConfig::resolve(&input, &site)?)
}

/// Flag values, with paths made absolute against the working directory.
fn overrides(cli: &Cli) -> std::io::Result<Overrides> {
    Ok(Overrides {
        title: cli.title.clone(),
        output: cli.output.as_deref().map(absolute_clean).transpose()?,
        template: cli.template.as_deref().map(absolute_clean).transpose()?,
        version: cli.build_version.clone(),
        jobs: cli.jobs,
        book: cli.book,
        relative: cli.relative,
    })
}
