/// Hosted backend serving a model profile.
///
/// Adding another provider means a new variant here, a client under
/// `services/`, and a branch in [`crate::LlmServiceProfiles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Jina AI embeddings API (`https://api.jina.ai`).
    Jina,
    /// Google Gemini generative language API.
    Gemini,
}
