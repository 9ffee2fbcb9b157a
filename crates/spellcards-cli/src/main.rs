use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use spellcards::{
    compose::component_letters, render_deck, CachedSource, CardText, DeckConfig, LocalSource,
    PptxWriter, RecordFormat, SpellList, SpellSource, TtgClient,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::console::ConsoleRenderer;
mod console;

#[derive(Parser)]
#[command(name = "spellcards", about = "Printable spell card decks")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ParserKind {
    /// ttg.club API, downloaded on demand and cached
    #[value(name = "ttg_api")]
    TtgApi,
    /// Local Foundry-style exports
    #[value(name = "lss")]
    Lss,
}

impl ParserKind {
    fn format(self) -> RecordFormat {
        match self {
            ParserKind::TtgApi => RecordFormat::Ttg,
            ParserKind::Lss => RecordFormat::Lss,
        }
    }

    fn cache_dir(self, cache_path: &Path) -> PathBuf {
        let name = match self {
            ParserKind::TtgApi => "ttg_api",
            ParserKind::Lss => "lss",
        };
        cache_path.join("spells").join(name)
    }

    fn source(self, cache_path: &Path) -> Box<dyn SpellSource> {
        let dir = self.cache_dir(cache_path);
        match self {
            ParserKind::TtgApi => Box::new(CachedSource::new(dir, TtgClient::default())),
            ParserKind::Lss => Box::new(LocalSource::new(dir)),
        }
    }
}

#[derive(Args)]
struct SourceArgs {
    #[arg(long, value_enum, default_value = "ttg_api")]
    parser: ParserKind,
    #[arg(long, default_value = ".cache")]
    cache_path: PathBuf,
}

#[derive(Subcommand)]
enum Cmd {
    /// Build a presentation with nine cards per slide
    Build {
        #[arg(long)]
        spell_path: PathBuf,
        #[arg(long)]
        output_file: PathBuf,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the deck to the terminal
    Preview {
        #[arg(long)]
        spell_path: PathBuf,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Show one parsed spell record
    Inspect {
        #[arg(long)]
        spell: String,
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn load_list(path: &Path) -> Result<SpellList> {
    let list = SpellList::load(path)
        .with_context(|| format!("reading spell list {}", path.display()))?;
    tracing::info!(spells = list.len(), path = %path.display(), "spell list loaded");
    Ok(list)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spellcards=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = DeckConfig::default();
    match cli.command {
        Cmd::Build {
            spell_path,
            output_file,
            source,
        } => {
            let list = load_list(&spell_path)?;
            let spells = source.parser.source(&source.cache_path);
            let mut writer = PptxWriter::new();
            let summary = render_deck(
                &list,
                &*spells,
                source.parser.format(),
                &config,
                &mut writer,
            )?;
            writer
                .save(&output_file)
                .with_context(|| format!("writing {}", output_file.display()))?;
            tracing::info!(
                cards = summary.cards,
                pages = summary.pages,
                output = %output_file.display(),
                "presentation written"
            );
        }
        Cmd::Preview { spell_path, source } => {
            let list = load_list(&spell_path)?;
            let spells = source.parser.source(&source.cache_path);
            let mut renderer = ConsoleRenderer::new();
            render_deck(
                &list,
                &*spells,
                source.parser.format(),
                &config,
                &mut renderer,
            )?;
            println!("{}", renderer.into_ansi_string());
        }
        Cmd::Inspect { spell, source } => {
            let spells = source.parser.source(&source.cache_path);
            let raw = spells.fetch(&spell)?;
            let record = source.parser.format().parse(&spell, raw)?;
            let card = CardText::compose(&record);
            println!("Spell: {}", record.name);
            println!("  Level: {}", record.level);
            println!("  School: {}", record.school);
            println!("  Classes: {}", record.classes.join(", "));
            println!("  Source: {}", record.source);
            println!("  Components: {}", component_letters(&record.components));
            if let Some(material) = &record.components.material {
                println!("  Material: {material}");
            }
            println!("  Styled runs: {}", card.body.runs().count());
        }
    }
    Ok(())
}
