//! Canned assistance guides, standing in for a real inference service.

use db::types::TaskCategory;

const PLUMBING_GUIDE: &str = "I can help you with that plumbing issue! Here's a step-by-step guide:\n\n1. **Safety First**: Turn off the water supply\n2. **Identify the problem**: Check for leaks or blockages\n3. **Gather tools**: You'll need basic plumbing tools\n4. **Follow the repair steps**: Detailed instructions based on your specific issue\n5. **Test the repair**: Turn water back on and check for leaks\n\n\u{1f4a1} **Pro Tip**: Take photos before disassembly to remember the order!";

const CARPENTRY_GUIDE: &str = "Let me help you with this carpentry task! Here's what you need to do:\n\n1. **Measure twice, cut once**: Ensure accurate measurements\n2. **Safety gear**: Wear protective equipment\n3. **Tools needed**: Based on your specific task\n4. **Step-by-step process**: Detailed instructions\n5. **Finishing touches**: Sanding and finishing tips\n\n\u{1f528} **Pro Tip**: Use quality materials for lasting results!";

const ELECTRICAL_GUIDE: &str = "\u{26a0}\u{fe0f} **Safety Warning**: If you're not comfortable with electrical work, please consult a professional.\n\nFor basic electrical tasks:\n1. **Turn off power**: Always turn off the circuit breaker\n2. **Test circuits**: Use a voltage tester\n3. **Follow codes**: Ensure compliance with local electrical codes\n4. **Professional help**: Consider hiring an electrician for complex work";

const FALLBACK_PROMPT: &str = "I'm here to help with your home task! Please provide more details about what you need assistance with, and I'll give you step-by-step guidance tailored to your specific situation.";

/// Uploaded image metadata. Accepted but never inspected; the attachment is
/// a hook point for a future multimodal inference call.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

/// Maps a category to a fixed multi-step guide. Unknown or missing
/// categories fall back to a prompt for more detail.
pub fn generate_response(
    description: &str,
    category: Option<&str>,
    image: Option<&ImageAttachment>,
) -> String {
    tracing::debug!(
        category = category.unwrap_or("<none>"),
        description_len = description.len(),
        has_image = image.is_some(),
        "generating canned assistance response"
    );

    let guide = match category.and_then(|c| c.parse::<TaskCategory>().ok()) {
        Some(TaskCategory::Plumbing) => PLUMBING_GUIDE,
        Some(TaskCategory::Carpentry) => CARPENTRY_GUIDE,
        Some(TaskCategory::Electrical) => ELECTRICAL_GUIDE,
        _ => FALLBACK_PROMPT,
    };
    guide.to_string()
}
