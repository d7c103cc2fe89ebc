use crate::application::ports::{LlmClient, LlmClientError};

/// Canned answer shaped like the default evaluation template.
pub const MOCK_ANALYSIS: &str = "1. จุดแข็งของพนักงานขาย\n- สุภาพและอธิบายความคุ้มครองชัดเจน\n\n\
2. จุดอ่อน\n- ไม่ได้สอบถามความต้องการของลูกค้า\n\n\
3. คำแนะนำที่ควรปรับปรุง\n- ถามคำถามปลายเปิดก่อนเสนอแผนประกัน";

pub struct MockLlmClient;

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _prompt: &str, _temperature: f32) -> Result<String, LlmClientError> {
        Ok(MOCK_ANALYSIS.to_string())
    }
}
