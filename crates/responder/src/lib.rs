// crates/responder/src/lib.rs

use std::sync::Arc;

use campus_core::{EntityFocus, Intent, LiveQuery};
use campus_knowledge::KnowledgeBase;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

pub mod numerals;
pub mod templates;

pub use numerals::roman;
pub use templates::{GREETING_VARIANTS, HELP_MENU};

/// Output of the responder: either final text or a hand-off to live data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendition {
    Text(String),
    Live(LiveQuery),
}

impl Rendition {
    pub fn text(&self) -> Option<&str> {
        match self {
            Rendition::Text(text) => Some(text),
            Rendition::Live(_) => None,
        }
    }
}

/// Pure formatting over the knowledge base.
#[derive(Debug, Clone)]
pub struct Responder {
    knowledge: Arc<KnowledgeBase>,
}

impl Responder {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }

    pub fn render(&self, intent: &Intent) -> Rendition {
        self.render_with(intent, &mut rand::thread_rng())
    }

    pub fn render_with<R: Rng + ?Sized>(&self, intent: &Intent, rng: &mut R) -> Rendition {
        let kb = &self.knowledge;
        let text = match intent {
            Intent::Live { query } => return Rendition::Live(*query),

            Intent::Greeting => GREETING_VARIANTS
                .choose(rng)
                .copied()
                .unwrap_or(GREETING_VARIANTS[0])
                .to_string(),
            Intent::Farewell => templates::FAREWELL.to_string(),
            Intent::Thanks => templates::THANKS.to_string(),
            Intent::Help | Intent::Unknown => HELP_MENU.to_string(),

            Intent::ListOrganizations => templates::organization_list(kb),
            Intent::CouncilOverview => templates::council_overview(kb),
            Intent::Rankings => templates::rankings(kb),
            Intent::LandmarkOverview => templates::landmark_overview(kb),
            Intent::CampusLife => templates::campus_life(kb),
            Intent::EventsOverview => templates::events_overview(kb),
            Intent::Benefits => templates::benefits(kb),
            Intent::Admissions => templates::admissions(kb),

            Intent::Organization { id, focus } => match kb.organization(id) {
                Some(org) => match focus {
                    EntityFocus::Overview => templates::organization_overview(org),
                    EntityFocus::SubGroups => templates::organization_sub_groups(org),
                    EntityFocus::Achievements => templates::organization_achievements(org),
                },
                None => {
                    warn!("Intent refers to unknown organization '{}'", id);
                    templates::not_found(id)
                }
            },
            Intent::SubGroup {
                organization_id,
                name,
            } => match kb.sub_group(organization_id, name) {
                Some((org, group)) => templates::sub_group(org, group),
                None => {
                    warn!(
                        "Intent refers to unknown vertical '{}/{}'",
                        organization_id, name
                    );
                    templates::not_found(name)
                }
            },
            Intent::Landmark { id } => match kb.landmark(id) {
                Some(spot) => templates::landmark(spot),
                None => {
                    warn!("Intent refers to unknown spot '{}'", id);
                    templates::not_found(id)
                }
            },
            Intent::Training { category, example } => {
                match kb.training_example(category, *example) {
                    Some(example) => templates::training_answer(example),
                    None => templates::training_not_found(category),
                }
            }
        };
        Rendition::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn responder() -> Responder {
        Responder::new(Arc::new(KnowledgeBase::embedded().unwrap()))
    }

    fn text(rendition: Rendition) -> String {
        match rendition {
            Rendition::Text(text) => text,
            Rendition::Live(query) => panic!("unexpected live deferral {:?}", query),
        }
    }

    #[test]
    fn greetings_come_from_the_candidate_set() {
        let responder = responder();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let greeting = text(responder.render_with(&Intent::Greeting, &mut rng));
            assert!(GREETING_VARIANTS.contains(&greeting.as_str()));
        }
    }

    #[test]
    fn live_intents_defer() {
        let rendition = responder().render(&Intent::live(LiveQuery::ActivePolls));
        assert_eq!(rendition, Rendition::Live(LiveQuery::ActivePolls));
        assert!(rendition.text().is_none());
    }

    #[test]
    fn achievements_are_a_numbered_list() {
        let responder = responder();
        let kb = KnowledgeBase::embedded().unwrap();
        let org = kb.organization("vsc").unwrap();

        let answer = text(responder.render(&Intent::organization("vsc", EntityFocus::Achievements)));
        for (i, achievement) in org.achievements.iter().enumerate() {
            assert!(answer.contains(&format!("{}. {}", i + 1, achievement)));
        }
    }

    #[test]
    fn verticals_use_roman_numerals() {
        let answer = text(responder().render(&Intent::organization("vsc", EntityFocus::SubGroups)));
        assert!(answer.contains("I. **Cricket**"));
        assert!(answer.contains("V. **Chess**"));
    }

    #[test]
    fn council_overview_names_the_council() {
        let answer = text(responder().render(&Intent::CouncilOverview));
        assert!(answer.contains("Student Affairs Council"));
    }

    #[test]
    fn unknown_renders_the_help_menu() {
        assert_eq!(
            responder().render(&Intent::Unknown),
            Rendition::Text(HELP_MENU.to_string())
        );
    }

    #[test]
    fn training_answers_carry_follow_ups() {
        let responder = responder();
        let kb = KnowledgeBase::embedded().unwrap();
        let index = kb.training.iter().position(|e| e.category == "fees").unwrap();

        let answer = text(responder.render(&Intent::Training {
            category: "fees".to_string(),
            example: index,
        }));
        assert!(answer.starts_with(&kb.training[index].answer));
        assert!(answer.contains("You might also ask:"));

        let missing = text(responder.render(&Intent::Training {
            category: "parking".to_string(),
            example: 0,
        }));
        assert!(missing.contains("I don't have an answer about parking"));
    }

    #[test]
    fn missing_entities_render_not_found() {
        let answer = text(responder().render(&Intent::Landmark {
            id: "moon-base".to_string(),
        }));
        assert!(answer.starts_with("Sorry, I couldn't find anything about moon-base"));
    }

    #[test]
    fn every_static_intent_renders_text() {
        let responder = responder();
        for intent in [
            Intent::Farewell,
            Intent::Thanks,
            Intent::Help,
            Intent::ListOrganizations,
            Intent::Rankings,
            Intent::LandmarkOverview,
            Intent::CampusLife,
            Intent::EventsOverview,
            Intent::Benefits,
            Intent::Admissions,
            Intent::organization("tsc", EntityFocus::Overview),
            Intent::SubGroup {
                organization_id: "tsc".to_string(),
                name: "robotics".to_string(),
            },
            Intent::Landmark {
                id: "clock-tower".to_string(),
            },
        ] {
            let answer = text(responder.render(&intent));
            assert!(!answer.trim().is_empty(), "{}", intent);
        }
    }
}
