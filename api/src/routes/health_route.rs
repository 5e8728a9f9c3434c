/// Handler: GET /
pub async fn health() -> &'static str {
    "News RAG backend is running"
}
