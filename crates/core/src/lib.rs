pub mod aggregator;
pub mod config;
pub mod http;
pub mod links;
pub mod metadata;
pub mod metrics;
pub mod release_name;
pub mod selector;
pub mod source;
pub mod testing;

pub use aggregator::{rank_by_votes, Aggregator, SearchError, SearchSettings};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, SanitizedConfig,
};
pub use http::build_client;
pub use links::{
    build_magnet, sanitize_filename, torrent_file_name, FetchError, FetchedTorrent,
    TorrentFetcher,
};
pub use metadata::{
    Enricher, EnrichmentResult, MediaType, MetadataError, MetadataLookup, OmdbClient, TitleQuery,
};
pub use release_name::{
    clean_display_title, extract_series_name, extract_year, format_size, looks_like_series,
};
pub use selector::{quality_rank, select_best};
pub use source::{
    CatalogSource, Entry, IndexSource, SearchPage, Source, SourceError, SourceKind, SourcePage,
    Variant,
};
