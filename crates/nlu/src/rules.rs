// crates/nlu/src/rules.rs

use std::fmt;
use std::sync::LazyLock;

use campus_core::{EntityFocus, Intent, LiveQuery};
use campus_knowledge::{AliasTable, KnowledgeBase};
use regex::Regex;
use serde::Serialize;

use crate::text::Utterance;

const MAX_UPCOMING_DAYS: u32 = 365;

static NEXT_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnext\s+(\d{1,4})\s+days?\b").unwrap());

const LIST_ORGANIZATIONS: &[&str] = &[
    "list all organizations",
    "list all organisations",
    "list organizations",
    "list of organizations",
    "all organizations",
    "all organisations",
    "list all clubs",
    "all clubs",
];

const EVENTS_NOW: &[&str] = &[
    "events now",
    "event now",
    "happening now",
    "going on now",
    "ongoing events",
    "current events",
    "live events",
    "events today",
    "events right now",
];

const UPCOMING_EVENTS: &[&str] = &[
    "upcoming events",
    "upcoming event",
    "upcoming",
    "future events",
    "next events",
    "events this week",
    "registrations open",
    "registration open",
    "open registrations",
];

const ACTIVE_POLLS: &[&str] = &["active polls", "open polls", "polls", "poll", "voting", "vote"];

const MY_PROFILE: &[&str] = &["my profile", "my details", "my account", "my info", "who am i"];

const MY_IDEAS: &[&str] = &["my ideas", "my idea", "my submitted ideas", "ideas i submitted"];

const MY_ACHIEVEMENTS: &[&str] = &[
    "my achievements",
    "my achievement",
    "my submitted achievements",
    "achievements i submitted",
];

const SUB_ITEM_REFINEMENTS: &[&str] = &[
    "verticals",
    "vertical",
    "sub groups",
    "subgroups",
    "teams",
    "team",
    "wings",
    "divisions",
    "clubs under",
];

const ACHIEVEMENT_REFINEMENTS: &[&str] = &[
    "achievements",
    "achievement",
    "awards",
    "accomplishments",
    "trophies",
    "wins",
];

const GREETINGS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "hiya",
    "good morning",
    "good afternoon",
    "good evening",
    "greetings",
    "namaste",
];

const FAREWELLS: &[&str] = &["bye", "goodbye", "see you", "good night", "farewell", "cya"];

const THANKS: &[&str] = &["thanks", "thank you", "thx", "much appreciated"];

const HELP: &[&str] = &["help", "menu", "what can you do", "options", "commands"];

const RANKINGS: &[&str] = &["ranking", "rankings", "ranked", "rank", "nirf"];

const LANDMARK_OVERVIEW: &[&str] = &[
    "campus spots",
    "spots on campus",
    "landmarks",
    "famous places",
    "places on campus",
    "places to visit",
];

const CAMPUS_LIFE: &[&str] = &["campus life", "student life", "life on campus", "life at"];

const EVENTS_OVERVIEW: &[&str] = &["events", "fests", "fest", "festivals", "festival"];

const BENEFITS: &[&str] = &[
    "benefits",
    "benefit",
    "perks",
    "why join",
    "why should i join",
];

const ADMISSIONS: &[&str] = &["admission", "admissions", "apply", "eligibility", "entrance"];

const LEGACY_LIST_ORGANIZATIONS: &[&str] = &[
    "which organizations",
    "what organizations",
    "show organizations",
    "student organizations",
    "organizations list",
    "clubs on campus",
    "what clubs",
    "which clubs",
];

const STUDENT_BODY: &[&str] = &["student body", "student bodies", "student government"];

/// Named rule positions, stable across releases so logs and metrics can
/// refer to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    ListOrganizations,
    EventsNow,
    UpcomingEvents,
    ActivePolls,
    MyProfile,
    MyIdeas,
    MyAchievements,
    OrganizationAlias,
    Greeting,
    Farewell,
    Thanks,
    Help,
    Rankings,
    LandmarkOverview,
    LandmarkKeyword,
    CouncilOverview,
    CampusLife,
    EventsOverview,
    Benefits,
    Admissions,
    SubGroupName,
    OrganizationName,
    LandmarkName,
    LegacyListOrganizations,
    StudentBody,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::ListOrganizations => "list_organizations",
            RuleId::EventsNow => "events_now",
            RuleId::UpcomingEvents => "upcoming_events",
            RuleId::ActivePolls => "active_polls",
            RuleId::MyProfile => "my_profile",
            RuleId::MyIdeas => "my_ideas",
            RuleId::MyAchievements => "my_achievements",
            RuleId::OrganizationAlias => "organization_alias",
            RuleId::Greeting => "greeting",
            RuleId::Farewell => "farewell",
            RuleId::Thanks => "thanks",
            RuleId::Help => "help",
            RuleId::Rankings => "rankings",
            RuleId::LandmarkOverview => "landmark_overview",
            RuleId::LandmarkKeyword => "landmark_keyword",
            RuleId::CouncilOverview => "council_overview",
            RuleId::CampusLife => "campus_life",
            RuleId::EventsOverview => "events_overview",
            RuleId::Benefits => "benefits",
            RuleId::Admissions => "admissions",
            RuleId::SubGroupName => "sub_group_name",
            RuleId::OrganizationName => "organization_name",
            RuleId::LandmarkName => "landmark_name",
            RuleId::LegacyListOrganizations => "legacy_list_organizations",
            RuleId::StudentBody => "student_body",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a rule may look at.
pub struct RuleContext<'a> {
    pub utterance: &'a Utterance,
    pub knowledge: &'a KnowledgeBase,
    pub aliases: &'a AliasTable,
    pub upcoming_days: u32,
}

type Matcher = Box<dyn Fn(&RuleContext<'_>) -> Option<Intent> + Send + Sync>;

pub struct Rule {
    id: RuleId,
    matcher: Matcher,
}

impl Rule {
    pub fn new<F>(id: RuleId, matcher: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> Option<Intent> + Send + Sync + 'static,
    {
        Self {
            id,
            matcher: Box::new(matcher),
        }
    }

    /// A rule that fires on any of `phrases` (whole-word match).
    pub fn keywords(id: RuleId, phrases: &'static [&'static str], intent: Intent) -> Self {
        Self::new(id, move |ctx| {
            ctx.utterance.has_any(phrases).then(|| intent.clone())
        })
    }

    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn apply(&self, ctx: &RuleContext<'_>) -> Option<Intent> {
        (self.matcher)(ctx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("id", &self.id).finish()
    }
}

/// Ordered rule list; the first rule producing an intent wins.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic rules that run before the fuzzy matcher.
    pub fn primary() -> Self {
        let mut set = Self::new();

        set.push(Rule::keywords(
            RuleId::ListOrganizations,
            LIST_ORGANIZATIONS,
            Intent::ListOrganizations,
        ));

        set.push(Rule::keywords(
            RuleId::EventsNow,
            EVENTS_NOW,
            Intent::live(LiveQuery::EventsNow),
        ));
        set.push(Rule::new(RuleId::UpcomingEvents, |ctx| {
            ctx.utterance.has_any(UPCOMING_EVENTS).then(|| {
                Intent::live(LiveQuery::UpcomingEvents {
                    days: upcoming_window(ctx.utterance, ctx.upcoming_days),
                })
            })
        }));
        set.push(Rule::keywords(
            RuleId::ActivePolls,
            ACTIVE_POLLS,
            Intent::live(LiveQuery::ActivePolls),
        ));
        set.push(Rule::keywords(
            RuleId::MyProfile,
            MY_PROFILE,
            Intent::live(LiveQuery::MyProfile),
        ));
        set.push(Rule::keywords(
            RuleId::MyIdeas,
            MY_IDEAS,
            Intent::live(LiveQuery::MyIdeas),
        ));
        set.push(Rule::keywords(
            RuleId::MyAchievements,
            MY_ACHIEVEMENTS,
            Intent::live(LiveQuery::MyAchievements),
        ));

        set.push(Rule::new(RuleId::OrganizationAlias, |ctx| {
            ctx.aliases
                .lookup(ctx.utterance.lowered())
                .map(|id| Intent::organization(id, refinement(ctx.utterance)))
        }));

        set.push(Rule::keywords(RuleId::Greeting, GREETINGS, Intent::Greeting));
        set.push(Rule::keywords(RuleId::Farewell, FAREWELLS, Intent::Farewell));
        set.push(Rule::keywords(RuleId::Thanks, THANKS, Intent::Thanks));
        set.push(Rule::keywords(RuleId::Help, HELP, Intent::Help));

        set.push(Rule::keywords(RuleId::Rankings, RANKINGS, Intent::Rankings));
        set.push(Rule::keywords(
            RuleId::LandmarkOverview,
            LANDMARK_OVERVIEW,
            Intent::LandmarkOverview,
        ));
        set.push(Rule::new(RuleId::LandmarkKeyword, |ctx| {
            ctx.knowledge
                .landmarks
                .iter()
                .find(|spot| spot.keywords.iter().any(|k| ctx.utterance.has_phrase(k)))
                .map(|spot| Intent::Landmark {
                    id: spot.id.clone(),
                })
        }));
        set.push(Rule::new(RuleId::CouncilOverview, |ctx| {
            let council = &ctx.knowledge.council;
            let named = ctx.utterance.has_phrase(&council.short_name)
                || ctx.utterance.has_phrase(&council.name);
            (named || council.keywords.iter().any(|k| ctx.utterance.has_phrase(k)))
                .then_some(Intent::CouncilOverview)
        }));
        set.push(Rule::keywords(
            RuleId::CampusLife,
            CAMPUS_LIFE,
            Intent::CampusLife,
        ));
        set.push(Rule::keywords(
            RuleId::EventsOverview,
            EVENTS_OVERVIEW,
            Intent::EventsOverview,
        ));
        set.push(Rule::keywords(RuleId::Benefits, BENEFITS, Intent::Benefits));
        set.push(Rule::keywords(
            RuleId::Admissions,
            ADMISSIONS,
            Intent::Admissions,
        ));

        set.push(Rule::new(RuleId::SubGroupName, |ctx| {
            ctx.knowledge
                .sub_group_mentioned_in(ctx.utterance.lowered())
                .map(|(org, group)| Intent::SubGroup {
                    organization_id: org.id.clone(),
                    name: group.name.clone(),
                })
        }));
        set.push(Rule::new(RuleId::OrganizationName, |ctx| {
            ctx.knowledge
                .organization_mentioned_in(ctx.utterance.lowered())
                .map(|org| Intent::organization(&org.id, refinement(ctx.utterance)))
        }));
        set.push(Rule::new(RuleId::LandmarkName, |ctx| {
            ctx.knowledge
                .landmark_mentioned_in(ctx.utterance.lowered())
                .map(|spot| Intent::Landmark {
                    id: spot.id.clone(),
                })
        }));

        set
    }

    /// Alternate phrasings consulted only after the fuzzy matcher misses.
    pub fn legacy() -> Self {
        let mut set = Self::new();
        set.push(Rule::keywords(
            RuleId::LegacyListOrganizations,
            LEGACY_LIST_ORGANIZATIONS,
            Intent::ListOrganizations,
        ));
        set.push(Rule::keywords(
            RuleId::StudentBody,
            STUDENT_BODY,
            Intent::CouncilOverview,
        ));
        set
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<(RuleId, Intent)> {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(ctx).map(|intent| (rule.id, intent)))
    }

    pub fn ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(|rule| rule.id).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Sub-items take precedence over achievements when both are mentioned.
pub fn refinement(utterance: &Utterance) -> EntityFocus {
    if utterance.has_any(SUB_ITEM_REFINEMENTS) {
        EntityFocus::SubGroups
    } else if utterance.has_any(ACHIEVEMENT_REFINEMENTS) {
        EntityFocus::Achievements
    } else {
        EntityFocus::Overview
    }
}

/// Honors an explicit "next N days" window, clamped to a year.
pub fn upcoming_window(utterance: &Utterance, default_days: u32) -> u32 {
    NEXT_DAYS
        .captures(utterance.lowered())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map(|days| days.clamp(1, MAX_UPCOMING_DAYS))
        .unwrap_or(default_days)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        kb: KnowledgeBase,
        aliases: AliasTable,
    }

    impl Fixture {
        fn new() -> Self {
            let kb = KnowledgeBase::embedded().unwrap();
            let aliases = AliasTable::from_knowledge(&kb);
            Self { kb, aliases }
        }

        fn run(&self, set: &RuleSet, text: &str) -> Option<(RuleId, Intent)> {
            let utterance = Utterance::new(text);
            let ctx = RuleContext {
                utterance: &utterance,
                knowledge: &self.kb,
                aliases: &self.aliases,
                upcoming_days: 7,
            };
            set.evaluate(&ctx)
        }

        fn primary(&self, text: &str) -> Option<(RuleId, Intent)> {
            self.run(&RuleSet::primary(), text)
        }
    }

    #[test]
    fn primary_rules_are_ordered() {
        let ids = RuleSet::primary().ids();
        let position = |id| ids.iter().position(|r| *r == id).unwrap();

        assert_eq!(ids[0], RuleId::ListOrganizations);
        assert!(position(RuleId::MyAchievements) < position(RuleId::OrganizationAlias));
        assert!(position(RuleId::OrganizationAlias) < position(RuleId::Greeting));
        assert!(position(RuleId::Help) < position(RuleId::Rankings));
        assert!(position(RuleId::Admissions) < position(RuleId::SubGroupName));
        assert_eq!(*ids.last().unwrap(), RuleId::LandmarkName);
    }

    #[test]
    fn list_organizations_wins_over_everything() {
        let f = Fixture::new();
        let (id, intent) = f.primary("hi, list all organizations please").unwrap();
        assert_eq!(id, RuleId::ListOrganizations);
        assert_eq!(intent, Intent::ListOrganizations);
    }

    #[test]
    fn live_keywords() {
        let f = Fixture::new();
        assert_eq!(
            f.primary("events now").unwrap().1,
            Intent::live(LiveQuery::EventsNow)
        );
        assert_eq!(
            f.primary("which registrations open this week").unwrap().1,
            Intent::live(LiveQuery::UpcomingEvents { days: 7 })
        );
        assert_eq!(
            f.primary("any active polls?").unwrap().1,
            Intent::live(LiveQuery::ActivePolls)
        );
        assert_eq!(
            f.primary("show my profile").unwrap().1,
            Intent::live(LiveQuery::MyProfile)
        );
        assert_eq!(
            f.primary("status of my ideas").unwrap().1,
            Intent::live(LiveQuery::MyIdeas)
        );
        // personal achievements beat the organization refinement
        assert_eq!(
            f.primary("my achievements in vsc").unwrap().1,
            Intent::live(LiveQuery::MyAchievements)
        );
    }

    #[test]
    fn upcoming_honors_explicit_window() {
        let f = Fixture::new();
        assert_eq!(
            f.primary("upcoming events in the next 30 days").unwrap().1,
            Intent::live(LiveQuery::UpcomingEvents { days: 30 })
        );
        assert_eq!(upcoming_window(&Utterance::new("next 0 days"), 7), 1);
        assert_eq!(upcoming_window(&Utterance::new("next 9999 days"), 7), 365);
        assert_eq!(upcoming_window(&Utterance::new("upcoming"), 14), 14);
    }

    #[test]
    fn alias_match_with_refinements() {
        let f = Fixture::new();

        let (id, intent) = f.primary("Tell me about the SPORTS BODY").unwrap();
        assert_eq!(id, RuleId::OrganizationAlias);
        assert_eq!(intent, Intent::organization("vsc", EntityFocus::Overview));

        assert_eq!(
            f.primary("vsc achievements").unwrap().1,
            Intent::organization("vsc", EntityFocus::Achievements)
        );
        assert_eq!(
            f.primary("what verticals does the tech council have").unwrap().1,
            Intent::organization("tsc", EntityFocus::SubGroups)
        );
        // sub-items beat achievements
        assert_eq!(
            f.primary("e-cell teams and awards").unwrap().1,
            Intent::organization("ecell", EntityFocus::SubGroups)
        );
    }

    #[test]
    fn conversational_keywords() {
        let f = Fixture::new();
        for text in ["hello", "hi", "hey there", "good morning", "Good Evening!"] {
            assert_eq!(f.primary(text).unwrap().1, Intent::Greeting, "{}", text);
        }
        assert_eq!(f.primary("ok bye").unwrap().1, Intent::Farewell);
        assert_eq!(f.primary("thank you").unwrap().1, Intent::Thanks);
        assert_eq!(f.primary("help").unwrap().1, Intent::Help);
        // "hi" must not fire inside other words
        assert_ne!(f.primary("this is a thing").map(|r| r.1), Some(Intent::Greeting));
    }

    #[test]
    fn topic_keywords() {
        let f = Fixture::new();
        assert_eq!(f.primary("nirf ranking").unwrap().1, Intent::Rankings);
        assert_eq!(f.primary("famous places").unwrap().1, Intent::LandmarkOverview);
        assert_eq!(
            f.primary("is the canteen open").unwrap(),
            (
                RuleId::LandmarkKeyword,
                Intent::Landmark {
                    id: "food-court".to_string()
                }
            )
        );
        assert_eq!(f.primary("what is sac").unwrap().1, Intent::CouncilOverview);
        assert_eq!(f.primary("student life").unwrap().1, Intent::CampusLife);
        assert_eq!(f.primary("annual fests").unwrap().1, Intent::EventsOverview);
        assert_eq!(f.primary("perks of joining").unwrap().1, Intent::Benefits);
        assert_eq!(f.primary("admission process").unwrap().1, Intent::Admissions);
    }

    #[test]
    fn name_substring_rules() {
        let f = Fixture::new();
        assert_eq!(
            f.primary("who leads robotics").unwrap(),
            (
                RuleId::SubGroupName,
                Intent::SubGroup {
                    organization_id: "tsc".to_string(),
                    name: "Robotics".to_string()
                }
            )
        );
        assert_eq!(
            f.primary("national service scheme awards").unwrap(),
            (
                RuleId::OrganizationName,
                Intent::organization("nss", EntityFocus::Achievements)
            )
        );
        assert_eq!(
            f.primary("directions to central library").unwrap().1,
            Intent::Landmark {
                id: "library".to_string()
            }
        );
    }

    #[test]
    fn legacy_rules() {
        let f = Fixture::new();
        let legacy = RuleSet::legacy();
        assert_eq!(
            f.run(&legacy, "which clubs can I join").unwrap().1,
            Intent::ListOrganizations
        );
        assert_eq!(
            f.run(&legacy, "who is the student body").unwrap(),
            (RuleId::StudentBody, Intent::CouncilOverview)
        );
        assert!(f.run(&legacy, "asdkjiqwe").is_none());
    }

    #[test]
    fn gibberish_matches_no_rule() {
        let f = Fixture::new();
        assert!(f.primary("asdkjiqwe").is_none());
    }
}
