pub mod adapters;
pub mod cache;
pub mod category;
pub mod client;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod page;
pub mod platform;
pub(crate) mod rate_limit;
pub mod strategy;

pub use adapters::{
    Adapter, AdapterRegistry, AmazonAdapter, FieldChains, FlipkartAdapter, GenericAdapter,
    MyntraAdapter, PartialProductRecord,
};
pub use cache::{ExtractionCache, FileCache, MemoryCache};
pub use category::infer_category;
pub use client::AnalyzeClient;
pub use error::{ClientError, ExtractError};
pub use orchestrator::{ExtractionReport, MessageReply, Orchestrator, PassState};
pub use page::Page;
pub use platform::{detect_from_url, detect_platform};
pub use strategy::{first_list, first_success, Lookup, Strategy};
