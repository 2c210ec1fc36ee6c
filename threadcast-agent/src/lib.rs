//! The article-to-thread pipeline.
//!
//! Four stages run in order for every submitted URL:
//!
//! 1. [`threadcast_web::ArticleSource`] fetches the article
//! 2. [`summarizer::Summarizer`] asks the model for dash-prefixed bullets
//! 3. [`composer::compose_thread`] turns title, URL and bullets into post-sized chunks
//! 4. [`publisher::Publisher`] posts the chunks as a reply chain
//!
//! [`pipeline::ThreadAgent`] wires them together and renders the outcome for
//! the web form.
pub mod composer;
pub mod pipeline;
pub mod publisher;
pub mod summarizer;

#[cfg(test)]
pub(crate) mod testing;

pub use composer::{compose_thread, MAX_CHUNK_CHARS};
pub use pipeline::{AgentError, RunReport, ThreadAgent};
pub use publisher::{PublishError, PublishedThread, Publisher};
pub use summarizer::{SummarizeError, Summarizer};
