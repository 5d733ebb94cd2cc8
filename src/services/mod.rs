pub mod catalog;
pub mod explainer;
pub mod optimizer;
pub mod profiles;
pub mod recommender;
pub mod selector;

pub use catalog::{Catalog, CatalogSource, SqliteCatalogSource, StaticCatalogSource};
pub use explainer::{
    CachingExplainer, ExplanationRequest, Explainer, OpenAiExplainer, TemplateExplainer,
};
pub use profiles::ProfileTables;
pub use recommender::Recommender;
