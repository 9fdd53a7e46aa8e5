use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::info;

use cultivate::assets::{AssetCache, SpriteManifest};
use cultivate::config::GameConfig;
use cultivate::geometry::Position;
use cultivate::world::{Hands, ItemWorld};
use cultivate::{Item, ItemKind, Resolver, Rule};

#[derive(Parser)]
#[command(name = "cultivate")]
#[command(about = "Become a productive member of your local community!")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Game configuration file (JSON); defaults are used when absent
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List every recipe in the game
    Recipes,
    /// Show how to make an item and what it can be used for
    How {
        /// Item name, e.g. "lemonade" or "water_bucket"
        item: String,
    },
    /// Try combining two items
    Combine { a: String, b: String },
    /// Walk through brewing a jug of lemonade
    Demo,
    /// Load the sprite folder and report which item images resolve
    Assets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading config {path}"))?,
        None => GameConfig::default(),
    };
    let resolver = Resolver::new();

    match cli.command {
        Commands::Recipes => {
            for rule in resolver.rules() {
                println!("{}", describe(rule));
            }
        }
        Commands::How { item } => {
            let kind: ItemKind = item.parse()?;
            let made: Vec<_> = resolver.recipes_for(kind).collect();
            if made.is_empty() {
                println!("{kind} is found, not made");
            }
            for rule in made {
                println!("make:  {}", describe(rule));
            }
            for rule in resolver.uses_of(kind) {
                println!("use:   {}", describe(rule));
            }
        }
        Commands::Combine { a, b } => {
            let c = resolver.combine_named(&a, &b, Position::ZERO)?;
            match (c.result, c.byproduct) {
                (Some(r), Some(by)) => println!("{r} (and {by})"),
                (Some(r), None) => println!("{r}"),
                _ => println!("nothing happens"),
            }
        }
        Commands::Demo => demo(&config, &resolver)?,
        Commands::Assets => assets(&config)?,
    }
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn describe(rule: &Rule) -> String {
    let mut line = format!("{} + {} = {}", rule.a, rule.b, rule.outcome.result);
    if let Some(by) = rule.outcome.byproduct {
        line.push_str(&format!(" (leaves {by})"));
    }
    line
}

fn demo(config: &GameConfig, resolver: &Resolver) -> Result<()> {
    let mut world = ItemWorld::new();
    let mut hands = Hands::new(config.hands.max(2));
    let player = Position::new(1000, 1000);
    let reach = config.reach.max(32);

    let bucket = world.spawn(Item::at(ItemKind::EmptyBucket, 990, 1000));
    let lemon = world.spawn(Item::at(ItemKind::Lemon, 1000, 990));
    let sugar = world.spawn(Item::at(ItemKind::Sugar, 1010, 1010));
    let river = world.spawn(Item::at(ItemKind::River, 1020, 1000));
    let fire = world.spawn(Item::at(ItemKind::Fire, 1000, 1030));

    if let Some(hint) = world.hint(player, reach) {
        println!("> {hint}");
    }

    let slot = hands.pick_up(&mut world, bucket)?;
    step("fill the bucket at the river", hands.combine_with_world(slot, river, resolver, &mut world, player)?)?;

    let other = hands.pick_up(&mut world, lemon)?;
    step("squeeze in a lemon", hands.combine_held(slot, other, resolver, &mut world, player)?)?;

    let other = hands.pick_up(&mut world, sugar)?;
    step("stir in the sugar", hands.combine_held(slot, other, resolver, &mut world, player)?)?;

    let done = hands.combine_with_world(slot, fire, resolver, &mut world, player)?;
    step("boil it over the fire", done)?;

    let left: Vec<_> = world.iter().map(|(_, item)| item.name()).collect();
    println!("left in the world: {}", left.join(", "));
    Ok(())
}

fn step(what: &str, reacted: Option<cultivate::world::Reacted>) -> Result<()> {
    let Some(reacted) = reacted else {
        bail!("could not {what}");
    };
    info!("demo step: {what}");
    match reacted.byproduct {
        Some(_) => println!("{what}: now holding {} (something was left behind)", reacted.result),
        None => println!("{what}: now holding {}", reacted.result),
    }
    Ok(())
}

fn assets(config: &GameConfig) -> Result<()> {
    let mut cache = AssetCache::new();
    let loaded = cache.load_folder(&config.sprites_dir);
    println!("{loaded} images in {}", config.sprites_dir.display());

    let manifest = match &config.manifest {
        Some(path) => SpriteManifest::load(path)
            .with_context(|| format!("loading sprite manifest {}", path.display()))?,
        None => SpriteManifest::default(),
    };

    for kind in ItemKind::ALL {
        match cache.item_image(kind, &manifest) {
            Ok(img) => println!("{:<22} {}x{}", kind.name(), img.width(), img.height()),
            Err(e) => println!("{:<22} missing ({e})", kind.name()),
        }
    }
    Ok(())
}
