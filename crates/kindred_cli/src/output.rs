//! Terminal rendering of outbound plans.
//!
//! The engine hands over data; all user-facing wording lives here.

use kindred_core::{OutboundPlan, PlanErrorKind};

const HELP_TEXT: &str = "\
commands:
  intro <name> <male|female> [age] [city]   register your profile
  search <min-age> <max-age> [sex] [city]   start or resume a search
  favorite                                  keep the shown candidate
  blacklist                                 never show this candidate again
  skip                                      move on without deciding
  favorites                                 list everyone you kept
  reset                                     clear the current search session
  help                                      this text
  quit                                      leave";

pub fn render(plan: &OutboundPlan) -> String {
    match plan {
        OutboundPlan::Presentation {
            candidate,
            photo_urls,
        } => {
            let mut lines = vec![
                format!(
                    "{}, {} ({})",
                    candidate.display_name, candidate.age, candidate.city
                ),
                candidate.profile_url.clone(),
            ];
            if photo_urls.is_empty() {
                lines.push("no photos available".to_string());
            } else {
                for url in photo_urls {
                    lines.push(format!("  photo: {url}"));
                }
            }
            lines.push("favorite / blacklist / skip ?".to_string());
            lines.join("\n")
        }

        OutboundPlan::Exhaustion => {
            "That's everyone matching your search. Try different criteria.".to_string()
        }

        OutboundPlan::FavoritesList { favorites } => {
            if favorites.is_empty() {
                return "No favorites yet. Run a search and keep someone!".to_string();
            }
            let mut lines = vec!["Your favorites:".to_string()];
            for (position, favorite) in favorites.iter().enumerate() {
                lines.push(format!(
                    "{}. {} - {} (added {})",
                    position + 1,
                    favorite.display_name,
                    favorite.profile_url,
                    favorite.added_at.format("%Y-%m-%d")
                ));
            }
            lines.join("\n")
        }

        OutboundPlan::Registered { profile } => {
            format!(
                "Profile saved: {}{}{}",
                profile.display_name,
                profile
                    .age
                    .map(|age| format!(", {age}"))
                    .unwrap_or_default(),
                profile
                    .city
                    .as_ref()
                    .map(|city| format!(", {city}"))
                    .unwrap_or_default(),
            )
        }

        OutboundPlan::Help => HELP_TEXT.to_string(),

        OutboundPlan::Error { kind, message } => match kind {
            PlanErrorKind::UpstreamUnavailable => {
                "Search is unavailable right now, try again in a moment.".to_string()
            }
            PlanErrorKind::StorageUnavailable => {
                "Couldn't save that, please retry the same command.".to_string()
            }
            PlanErrorKind::InvalidCriteria => format!("Bad search input: {message}"),
            PlanErrorKind::InvalidState => {
                "Nothing to decide on - start with 'search'.".to_string()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use kindred_core::{Candidate, CandidateId, Sex};

    use super::*;

    #[test]
    fn presentation_lists_photos_in_plan_order() {
        let plan = OutboundPlan::Presentation {
            candidate: Candidate {
                id: CandidateId::new("1"),
                display_name: "Ada".to_string(),
                age: 24,
                city: "Riga".to_string(),
                sex: Sex::Female,
                profile_url: "https://graph.example/1".to_string(),
                photos: vec![],
            },
            photo_urls: vec!["https://p/1".to_string(), "https://p/2".to_string()],
        };
        let text = render(&plan);
        let first = text.find("https://p/1").unwrap();
        let second = text.find("https://p/2").unwrap();
        assert!(first < second);
        assert!(text.starts_with("Ada, 24 (Riga)"));
    }

    #[test]
    fn empty_favorites_get_a_nudge() {
        let text = render(&OutboundPlan::FavoritesList { favorites: vec![] });
        assert!(text.contains("No favorites"));
    }
}
