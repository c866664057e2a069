use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use clap::Parser;
use mc_model::Canonicalizer;
use mc_model::canonical::DEFAULT_CANONICAL_EXTENSIONS;
use mc_vanilla::{VanillaCatalog, VanillaSource};

static SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Clone, Parser)]
#[command(name = "packlink")]
#[command(about = "Resolve content references across Bedrock resource and behavior packs")]
pub struct Settings {
    /// Read built-in reference metadata from this JSON file instead of the embedded copy
    #[arg(long, env = "PACKLINK_VANILLA_CATALOG")]
    pub vanilla_catalog: Option<PathBuf>,

    /// File extensions stripped when comparing reference paths
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "png,jpg,jpeg,tga,ogg,wav,fsb"
    )]
    pub canonical_extensions: Vec<String>,

    /// Never consult the built-in catalog when recording unresolved references
    #[arg(long)]
    pub skip_vanilla_classification: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vanilla_catalog: None,
            canonical_extensions: DEFAULT_CANONICAL_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            skip_vanilla_classification: false,
        }
    }
}

impl Settings {
    /// Initialize the global settings. Returns the rejected value if they were
    /// already set.
    pub fn init_global(settings: Settings) -> Result<(), Settings> {
        SETTINGS.set(settings)
    }

    /// The global settings, or the defaults if none were installed.
    pub fn global() -> &'static Settings {
        SETTINGS.get_or_init(Settings::default)
    }

    pub fn canonicalizer(&self) -> Canonicalizer {
        Canonicalizer::new(&self.canonical_extensions)
    }

    /// A catalog over the configured file, or the shared embedded catalog.
    pub fn catalog(&self) -> Arc<VanillaCatalog> {
        match &self.vanilla_catalog {
            Some(path) => Arc::new(VanillaCatalog::new(VanillaSource::File(path.clone()))),
            None => VanillaCatalog::global(),
        }
    }
}
