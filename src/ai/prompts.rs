use crate::core::post::PostRequest;

pub const SYSTEM_PROMPT: &str =
    "You are a LinkedIn content expert specializing in creating engaging, professional posts.";

const EXPERTISE_PLACEHOLDER: &str = "General";
const STORY_PLACEHOLDER: &str = "None";

pub fn build_user_prompt(request: &PostRequest) -> String {
    let expertise = request.expertise.as_deref().unwrap_or(EXPERTISE_PLACEHOLDER);
    let story = request.story.as_deref().unwrap_or(STORY_PLACEHOLDER);

    format!(
        r#"Create an engaging LinkedIn post about:
Topic: {topic}
Industry: {industry}
Expertise: {expertise}
Personal Story: {story}

Include:
1. Attention-grabbing hook
2. Key insights with data points
3. Personal perspective
4. Call to action
5. 3-5 relevant hashtags

Format with proper spacing and emojis for better readability."#,
        topic = request.topic,
        industry = request.industry,
    )
}
