use anyhow::{Context, Result, bail};
use rteditor_config::{Config, HeadingStyle as HeadingStyleConfig};
use rteditor_engine::editing::{EditorContext, Locale, Theme, ThemeMode};
use rteditor_engine::export::{self, HeadingStyle, MarkdownOptions};
use rteditor_engine::extensions::builtin_extensions;
use rteditor_engine::marks::comment_ranges;
use rteditor_engine::reorder::{DragHandleOptions, handle_decorations};
use rteditor_engine::Editor;
use std::{env, path::PathBuf, process};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Markdown,
    Html,
    Json,
    Stats,
    Comments,
    Handles,
}

impl Format {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "markdown" | "md" => Some(Format::Markdown),
            "html" => Some(Format::Html),
            "json" => Some(Format::Json),
            "stats" => Some(Format::Stats),
            "comments" => Some(Format::Comments),
            "handles" => Some(Format::Handles),
            _ => None,
        }
    }
}

fn markdown_options(config: &Config) -> MarkdownOptions {
    MarkdownOptions {
        gfm: config.export.gfm,
        heading_style: match config.export.heading_style {
            HeadingStyleConfig::Atx => HeadingStyle::Atx,
            HeadingStyleConfig::Setext => HeadingStyle::Setext,
        },
        escape: config.export.escape,
    }
}

fn drag_handle_options(config: &Config) -> DragHandleOptions {
    DragHandleOptions {
        handle_class: config.drag_handle.handle_class.clone(),
        drop_indicator_class: config.drag_handle.drop_indicator_class.clone(),
    }
}

fn editor_context(config: &Config) -> EditorContext {
    let locale = match config.editor.locale.as_str() {
        "zh-TW" | "zh-tw" => Locale::ZhTw,
        "en" => Locale::En,
        other => {
            log::warn!("Unknown locale '{other}', using en");
            Locale::En
        }
    };
    let mode = match config.editor.theme_mode.as_str() {
        "dark" => ThemeMode::Dark,
        "auto" => ThemeMode::Auto,
        _ => ThemeMode::Light,
    };
    EditorContext {
        theme: Theme {
            name: config.editor.theme.clone(),
            mode,
        },
        locale,
    }
}

fn run(document: PathBuf, format: Format, config: &Config) -> Result<String> {
    let path = config.resolve_document(&document);
    log::info!("Reading document: {}", path.display());
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read document '{}'", path.display()))?;
    let doc = export::from_json(&json)
        .with_context(|| format!("Failed to load document '{}'", path.display()))?;

    let editor = Editor::with_context(doc, editor_context(config)).with_extensions(vec![builtin_extensions()]);
    log::info!("Loaded extensions: {}", editor.extension_names().join(", "));

    let output = match format {
        Format::Markdown => editor.to_markdown(&markdown_options(config)),
        Format::Html => editor.to_html(),
        Format::Json => editor.to_json()?,
        Format::Stats => {
            let stats = editor.stats(config.word_count.words_per_minute);
            format!(
                "words: {}\ncharacters: {}\ncharacters (with spaces): {}\nsentences: {}\nreading time: {} min",
                stats.words, stats.characters, stats.characters_with_spaces, stats.sentences, stats.reading_time
            )
        }
        Format::Comments => comment_ranges(editor.doc())
            .iter()
            .map(|range| {
                let state = if range.resolved { "resolved" } else { "open" };
                format!(
                    "{}\t{}\t{}..{}\t{state}\t{}",
                    range.comment_id, range.thread_id, range.from, range.to, range.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Format::Handles => handle_decorations(
            editor.doc(),
            &drag_handle_options(config),
            editor.context().locale,
            editor.is_editable(),
        )
        .iter()
        .map(|handle| format!("{}\t{}\t{}\t{}", handle.key, handle.pos, handle.class, handle.aria_label))
        .collect::<Vec<_>>()
        .join("\n"),
    };
    Ok(output)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config_path = Config::config_path();
    log::info!("Config path: {}", config_path.display());

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            log::info!("No config file, using defaults");
            Config::default()
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let args: Vec<String> = env::args().collect();
    let (document, format) = match args.as_slice() {
        [_, document] => (PathBuf::from(document), Format::Markdown),
        [_, document, format] => match Format::parse(format) {
            Some(format) => (PathBuf::from(document), format),
            None => bail!("Unknown format '{format}' (expected markdown, html, json, stats, comments or handles)"),
        },
        _ => {
            let program = args.first().map(String::as_str).unwrap_or("rteditor-cli");
            eprintln!("Usage: {program} <document.json> [markdown|html|json|stats|comments|handles]");
            eprintln!("Export defaults are read from {}", config_path.display());
            process::exit(1);
        }
    };

    let output = run(document, format, &config)?;
    println!("{output}");
    Ok(())
}
