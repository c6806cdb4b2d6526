//! Email assembly and delivery for Courier
//!
//! - `renderer`: `[Name]` placeholder substitution over stored templates
//! - `message`: MIME message assembly (lettre)
//! - `transport`: the send variants used by the orchestration layer
//! - `provider` / `ses`: raw message submission through AWS SES

pub mod message;
pub mod provider;
pub mod renderer;
pub mod ses;
pub mod transport;

pub use message::{AttachmentSource, MessageError, RenderedMessage};
pub use provider::{EmailProvider, EmailProviderError, ProviderResponse, RawEmail};
pub use renderer::{RenderError, TemplateRenderer};
pub use ses::SesEmailProvider;
pub use transport::{EmailEnvelope, EmailTransport, MimeTransport};
