use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use collage::{
    AssetChain, CreationRecord, CreationRepository, DirPresetStore, Direction, EditorConfig,
    EditorSession, FormValues, IdGenerator, ImageCategory, ImageRecord, JsonDirStore,
    LayerFactory, LayerFormRegistry, PresetStore, UuidIdGenerator,
};

#[derive(Parser, Debug)]
#[command(name = "collage", version)]
struct Cli {
    /// Config file (JSON). Missing file means defaults.
    #[arg(long, global = true, default_value = "collage.json")]
    config: PathBuf,

    /// Override the document store directory.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Override the preset directory.
    #[arg(long, global = true)]
    presets: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a creation (blank, or from a template) and print its id.
    New(NewArgs),
    /// List stored creations.
    List,
    /// Print a creation record as JSON.
    Show {
        /// Creation id.
        id: String,
    },
    /// Delete a creation.
    Delete {
        /// Creation id.
        id: String,
    },
    /// Append a layer on top.
    AddLayer(AddLayerArgs),
    /// Remove a layer by index.
    RemoveLayer {
        /// Creation id.
        id: String,
        /// Layer index.
        index: usize,
    },
    /// Reorder a layer.
    Arrange {
        /// Creation id.
        id: String,
        /// Layer index.
        index: usize,
        /// Where to move it.
        #[arg(value_enum)]
        action: ArrangeAction,
    },
    /// Commit form-style `name=value` inputs (e.g. `title=Hi layer-0-size=48`).
    Set {
        /// Creation id.
        id: String,
        /// Inputs to commit.
        #[arg(required = true)]
        pairs: Vec<String>,
    },
    /// Store an image file as an asset and print its id.
    Upload(UploadArgs),
    /// Use a stored image as background or as a new image layer.
    Promote {
        /// Creation id.
        id: String,
        /// Image asset id.
        image: String,
        /// `background` or `image`.
        #[arg(long, default_value = "image")]
        category: ImageCategory,
    },
    /// Write a portable JSON bundle.
    Export {
        /// Creation id.
        id: String,
        /// Output path.
        #[arg(long)]
        out: PathBuf,
    },
    /// Restore a JSON bundle and print the creation id.
    Import {
        /// Bundle path.
        path: PathBuf,
    },
}

#[derive(Parser, Debug)]
struct NewArgs {
    /// Title (defaults to the configured title).
    #[arg(long)]
    title: Option<String>,
    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,
    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,
    /// Start from `templates/<name>.json` in the preset directory.
    #[arg(long)]
    template: Option<String>,
}

#[derive(Parser, Debug)]
struct AddLayerArgs {
    /// Creation id.
    id: String,
    /// Layer type: font, icon, icon-callout or image.
    #[arg(long = "type")]
    layer_type: String,
    /// Layer fields as a JSON object.
    #[arg(long, conflicts_with = "preset")]
    data: Option<String>,
    /// Start from `layers/<type>.json` in the preset directory.
    #[arg(long, default_value_t = false)]
    preset: bool,
}

#[derive(Parser, Debug)]
struct UploadArgs {
    /// Image file.
    path: PathBuf,
    /// Asset id (generated when omitted).
    #[arg(long)]
    id: Option<String>,
    /// `background` or `image`.
    #[arg(long, default_value = "background")]
    category: ImageCategory,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ArrangeAction {
    Front,
    Back,
    Up,
    Down,
}

struct App {
    config: EditorConfig,
    repo: CreationRepository,
    forms: Arc<LayerFormRegistry>,
    assets: AssetChain,
    presets: DirPresetStore,
}

impl App {
    fn open(&self, id: &str) -> anyhow::Result<EditorSession> {
        EditorSession::open(self.repo.clone(), self.forms.clone(), id)
            .with_context(|| format!("open creation '{id}'"))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = EditorConfig::load(&cli.config)
        .with_context(|| format!("load config '{}'", cli.config.display()))?;
    if let Some(store) = &cli.store {
        config.store_dir = store.clone();
    }
    if let Some(presets) = &cli.presets {
        config.preset_dir = presets.clone();
    }
    init_logging(&config, cli.verbose);

    let app = build_app(config);
    match cli.cmd {
        Command::New(args) => cmd_new(&app, args),
        Command::List => cmd_list(&app),
        Command::Show { id } => cmd_show(&app, &id),
        Command::Delete { id } => {
            app.open(&id)?.delete()?;
            eprintln!("deleted {id}");
            Ok(())
        }
        Command::AddLayer(args) => cmd_add_layer(&app, args),
        Command::RemoveLayer { id, index } => {
            let mut session = app.open(&id)?;
            report(session.remove_layer(index)?);
            Ok(())
        }
        Command::Arrange { id, index, action } => cmd_arrange(&app, &id, index, action),
        Command::Set { id, pairs } => cmd_set(&app, &id, &pairs),
        Command::Upload(args) => cmd_upload(&app, args),
        Command::Promote {
            id,
            image,
            category,
        } => {
            let mut session = app.open(&id)?;
            if !app.assets.contains(&image) {
                tracing::warn!(image = %image, "image is not stored; it will render as a placeholder");
            }
            report(session.promote_image(&image, category)?);
            Ok(())
        }
        Command::Export { id, out } => cmd_export(&app, &id, &out),
        Command::Import { path } => cmd_import(&app, &path),
    }
}

fn init_logging(config: &EditorConfig, verbose: u8) {
    let level = match verbose {
        0 => config.log_level.parse().unwrap_or(tracing::Level::WARN),
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn build_app(config: EditorConfig) -> App {
    let ids: Arc<dyn IdGenerator> = Arc::new(UuidIdGenerator);
    let factory = Arc::new(LayerFactory::new(ids));
    let creations = Arc::new(JsonDirStore::<CreationRecord>::new(config.creations_dir()));
    let uploads = Arc::new(JsonDirStore::<ImageRecord>::new(config.images_dir()));
    let preset_images = Arc::new(JsonDirStore::<ImageRecord>::new(config.preset_dir.join("images")));
    App {
        repo: CreationRepository::new(creations, factory),
        forms: Arc::new(LayerFormRegistry::with_defaults(config.name_cap)),
        assets: AssetChain::new(uploads).with_source(preset_images),
        presets: DirPresetStore::new(config.preset_dir.clone()),
        config,
    }
}

fn report(written: bool) {
    eprintln!("{}", if written { "saved" } else { "unchanged" });
}

fn cmd_new(app: &App, args: NewArgs) -> anyhow::Result<()> {
    let factory = app.repo.factory();
    let mut creation = match &args.template {
        Some(name) => {
            let payload = app
                .presets
                .fetch_template(name)
                .with_context(|| format!("load template '{name}'"))?;
            factory.creation_from_template(&payload)?
        }
        None => factory.blank_creation(
            &app.config.default_title,
            app.config.default_width,
            app.config.default_height,
        ),
    };
    if let Some(title) = args.title {
        creation = creation.with_title(title);
    }
    if let Some(width) = args.width {
        creation = creation.with_width(width);
    }
    if let Some(height) = args.height {
        creation = creation.with_height(height);
    }
    let session = EditorSession::create(app.repo.clone(), app.forms.clone(), creation)?;
    println!("{}", session.creation().id());
    Ok(())
}

fn cmd_list(app: &App) -> anyhow::Result<()> {
    for creation in app.repo.get_all()? {
        println!(
            "{}\t{}\t{}x{}\t{} layers",
            creation.id(),
            creation.title(),
            creation.width(),
            creation.height(),
            creation.layer_count()
        );
    }
    Ok(())
}

fn cmd_show(app: &App, id: &str) -> anyhow::Result<()> {
    let record = app
        .repo
        .get_record(id)?
        .with_context(|| format!("creation '{id}' does not exist"))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn cmd_add_layer(app: &App, args: AddLayerArgs) -> anyhow::Result<()> {
    let mut session = app.open(&args.id)?;
    let written = if args.preset {
        session.add_layer_from_preset(&app.presets, &args.layer_type)?
    } else {
        let data: serde_json::Value = match &args.data {
            Some(raw) => serde_json::from_str(raw).context("parse --data as JSON")?,
            None => serde_json::Value::Null,
        };
        let layer = app.repo.factory().create_layer(&args.layer_type, &data)?;
        session.add_layer(layer)?
    };
    report(written);
    Ok(())
}

fn cmd_arrange(app: &App, id: &str, index: usize, action: ArrangeAction) -> anyhow::Result<()> {
    let mut session = app.open(id)?;
    if index >= session.creation().layer_count() {
        anyhow::bail!(
            "layer index {index} out of range ({} layers)",
            session.creation().layer_count()
        );
    }
    let written = match action {
        ArrangeAction::Front => session.bring_to_front(index)?,
        ArrangeAction::Back => session.send_to_back(index)?,
        ArrangeAction::Up => session.move_layer(index, Direction::Up)?,
        ArrangeAction::Down => session.move_layer(index, Direction::Down)?,
    };
    report(written);
    Ok(())
}

fn cmd_set(app: &App, id: &str, pairs: &[String]) -> anyhow::Result<()> {
    let mut form = FormValues::new();
    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .with_context(|| format!("expected name=value, got '{pair}'"))?;
        form.set(name, value);
    }
    let mut session = app.open(id)?;
    report(session.commit_form(&form)?);
    Ok(())
}

fn cmd_upload(app: &App, args: UploadArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.path)
        .with_context(|| format!("read image '{}'", args.path.display()))?;
    let id = match args.id {
        Some(id) => id,
        None => app.repo.factory().ids().generate(),
    };
    let record = app.assets.upload(&id, args.category, bytes)?;
    match record.dimensions() {
        Ok((w, h)) => eprintln!("stored {} ({}, {w}x{h})", record.id, record.mime_type()),
        Err(err) => {
            tracing::warn!(image = %record.id, error = %err, "stored image could not be decoded");
        }
    }
    println!("{}", record.id);
    Ok(())
}

fn cmd_export(app: &App, id: &str, out: &Path) -> anyhow::Result<()> {
    let bundle = collage::export_bundle(&app.repo, &app.assets, id)?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, bundle.to_json_pretty()?)
        .with_context(|| format!("write bundle '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_import(app: &App, path: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read bundle '{}'", path.display()))?;
    let creation = collage::import_bundle(&text, &app.repo, &app.assets)?;
    println!("{}", creation.id());
    Ok(())
}
