//! Known tracker sites and the run's loaded site list.

use tmdbtrack_core::types::{SiteConfig, SiteSchema};

/// A site the tool knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub default_url: &'static str,
    pub schema: SiteSchema,
}

pub const CATALOG: &[CatalogEntry] = &[
    unit3d("ATH", "Aither", "https://aither.cc/api/torrents/filter"),
    CatalogEntry {
        key: "BHD",
        name: "Beyond-HD",
        default_url: "https://beyond-hd.me/api/torrents",
        schema: SiteSchema::BeyondHd,
    },
    unit3d("BLU", "Blutopia", "https://blutopia.cc/api/torrents/filter"),
    unit3d("FNP", "FearNoPeer", "https://fearnopeer.com/api/torrents/filter"),
    unit3d("LDU", "TheLDU", "https://theldu.to/api/torrents/filter"),
    unit3d("LST", "L0ST", "https://lst.gg/api/torrents/filter"),
    unit3d("OTW", "OldToons.World", "https://oldtoons.world/api/torrents/filter"),
    unit3d("OE", "OnlyEncodes", "https://onlyencodes.cc/api/torrents/filter"),
    unit3d(
        "PSS",
        "PrivateSilverScreen",
        "https://privatesilverscreen.cc/api/torrents/filter",
    ),
    unit3d("RFX", "ReelFliX", "https://reelflix.xyz/api/torrents/filter"),
    unit3d("ULCX", "Upload.cx", "https://upload.cx/api/torrents/filter"),
];

const fn unit3d(key: &'static str, name: &'static str, default_url: &'static str) -> CatalogEntry {
    CatalogEntry {
        key,
        name,
        default_url,
        schema: SiteSchema::Unit3d,
    }
}

pub fn catalog_entry(key: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.key.eq_ignore_ascii_case(key))
}

/// Sites loaded for this run, in declared order.
#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    sites: Vec<SiteConfig>,
}

impl SiteRegistry {
    pub fn new(sites: Vec<SiteConfig>) -> Self {
        Self { sites }
    }

    pub fn list_enabled(&self) -> Vec<&SiteConfig> {
        self.sites.iter().filter(|s| s.enabled).collect()
    }

    pub fn list_disabled(&self) -> Vec<&SiteConfig> {
        self.sites.iter().filter(|s| !s.enabled).collect()
    }

    pub fn get(&self, site_key: &str) -> Option<&SiteConfig> {
        self.sites.iter().find(|s| s.site_key == site_key)
    }

    /// `Name (KEY)` for a registered site, the bare key otherwise.
    pub fn label(&self, site_key: &str) -> String {
        self.get(site_key)
            .map(SiteConfig::label)
            .unwrap_or_else(|| site_key.to_string())
    }
}
