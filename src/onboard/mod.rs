//! The questionnaire-completion flow: answers in, a full starter document
//! out, or nothing at all.

use crate::content::GeminiClient;
use crate::domain::{QuestionnaireAnswers, UserData};
use crate::error::ContentError;

/// Turn questionnaire answers into a complete starter document.
///
/// The profile is generated first because both follow-up calls need it.
/// Avatar and starter skills then run concurrently; if either fails the
/// whole flow fails and no partial document is produced. Each call carries
/// its own configured deadline, the avatar's being the longest.
pub async fn complete_questionnaire(
    client: &GeminiClient,
    answers: &QuestionnaireAnswers,
) -> Result<UserData, ContentError> {
    let profile = client.generate_cognitive_profile(answers).await?;
    tracing::info!(name = %profile.name, "cognitive profile generated");

    let (avatar_url, skills) = tokio::try_join!(
        client.generate_avatar(&profile.avatar_description),
        client.generate_initial_skills(&profile),
    )?;
    tracing::info!(skills = skills.len(), "onboarding content generated");

    Ok(UserData {
        profile,
        avatar_url,
        skills,
        projects: Vec::new(),
    })
}
