// crates/responder/src/templates.rs

use campus_knowledge::{
    BulletGroup, KnowledgeBase, Landmark, Organization, SubGroup, TrainingExample,
};

use crate::numerals::roman;

pub const GREETING_VARIANTS: &[&str] = &[
    "Hello! I'm the campus assistant. Ask me about student organizations, campus spots or what's happening today.",
    "Hi there! Want to know about clubs, events or famous places on campus?",
    "Hey! How can I help you with campus life today?",
    "Greetings! I can tell you about organizations, their verticals, achievements and live events.",
];

pub const FAREWELL: &str = "Goodbye! Come back any time you have a question about campus.";

pub const THANKS: &str = "You're welcome! Anything else you'd like to know?";

pub const HELP_MENU: &str = "I can help you with:\n\n\
1. **Organizations**: \"list all organizations\", \"what is VSC\"\n\
2. **Verticals**: \"VSC verticals\", \"tell me about robotics\"\n\
3. **Achievements**: \"VSC achievements\"\n\
4. **Campus spots**: \"famous places on campus\", \"where is the clock tower\"\n\
5. **Live updates**: \"events now\", \"upcoming events\", \"active polls\"\n\
6. **Your records**: \"my profile\", \"my ideas\", \"my achievements\"\n\
7. **General**: rankings, admissions, campus life, benefits of joining";

pub fn not_found(what: &str) -> String {
    format!(
        "Sorry, I couldn't find anything about {}. Type \"help\" to see what I can answer.",
        what
    )
}

pub fn training_not_found(category: &str) -> String {
    format!(
        "I don't have an answer about {} yet. Try rephrasing, or type \"help\" for topics I know.",
        category
    )
}

pub fn numbered<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {}", i + 1, line.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn roman_list<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {}", roman(i + 1), line.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bullet_groups(groups: &[BulletGroup]) -> String {
    roman_list(groups.iter().map(|group| {
        let bullets = group
            .bullets
            .iter()
            .map(|b| format!("   - {}", b))
            .collect::<Vec<_>>()
            .join("\n");
        if bullets.is_empty() {
            format!("**{}**", group.title)
        } else {
            format!("**{}**\n{}", group.title, bullets)
        }
    }))
}

pub fn organization_list(kb: &KnowledgeBase) -> String {
    format!(
        "Student organizations under the {} ({}):\n\n{}\n\nAsk about any of them by name for details.",
        kb.council.name,
        kb.council.short_name,
        numbered(
            kb.organizations
                .iter()
                .map(|org| format!("**{}** ({})", org.name, org.short_name))
        )
    )
}

pub fn council_overview(kb: &KnowledgeBase) -> String {
    let names = kb
        .organizations
        .iter()
        .map(|org| org.short_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "**{} ({})**\n\n{}\n\nIt oversees {} organizations: {}.",
        kb.council.name,
        kb.council.short_name,
        kb.council.description,
        kb.organizations.len(),
        names
    )
}

pub fn organization_overview(org: &Organization) -> String {
    let mut text = format!("**{} ({})**\n\n{}", org.name, org.short_name, org.description);
    if !org.sub_groups.is_empty() {
        let names = org
            .sub_groups
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(&format!("\n\nVerticals: {}.", names));
    }
    text.push_str(&format!(
        "\n\nAsk \"{} verticals\" or \"{} achievements\" to learn more.",
        org.short_name, org.short_name
    ));
    text
}

pub fn organization_sub_groups(org: &Organization) -> String {
    if org.sub_groups.is_empty() {
        return format!("{} has no verticals listed yet.", org.name);
    }
    format!(
        "{} has {} verticals:\n\n{}",
        org.name,
        org.sub_groups.len(),
        roman_list(org.sub_groups.iter().map(|g| {
            if g.description.is_empty() {
                format!("**{}**", g.name)
            } else {
                format!("**{}**: {}", g.name, g.description)
            }
        }))
    )
}

pub fn organization_achievements(org: &Organization) -> String {
    if org.achievements.is_empty() {
        return format!("No achievements are recorded for {} yet.", org.name);
    }
    format!(
        "Achievements of the {}:\n\n{}",
        org.name,
        numbered(&org.achievements)
    )
}

pub fn sub_group(org: &Organization, group: &SubGroup) -> String {
    let mut text = format!("**{}** ({})", group.name, org.name);
    if !group.description.is_empty() {
        text.push_str(&format!("\n\n{}", group.description));
    }
    if !group.activities.is_empty() {
        text.push_str(&format!(
            "\n\nActivities:\n{}",
            numbered(group.activities.iter().map(|a| {
                if a.description.is_empty() {
                    format!("**{}**", a.name)
                } else {
                    format!("**{}**: {}", a.name, a.description)
                }
            }))
        ));
    }
    text
}

pub fn landmark(spot: &Landmark) -> String {
    let mut text = format!("**{}**\n\n{}", spot.name, spot.description);
    if !spot.highlights.is_empty() {
        text.push_str(&format!(
            "\n\nHighlights:\n{}",
            roman_list(
                spot.highlights
                    .iter()
                    .map(|h| format!("**{}**: {}", h.name, h.description))
            )
        ));
    }
    text
}

pub fn landmark_overview(kb: &KnowledgeBase) -> String {
    format!(
        "Famous spots at {}:\n\n{}\n\nAsk about any spot by name for details.",
        kb.university,
        numbered(kb.landmarks.iter().map(|spot| format!("**{}**", spot.name)))
    )
}

pub fn rankings(kb: &KnowledgeBase) -> String {
    if kb.rankings.is_empty() {
        return not_found("rankings");
    }
    format!(
        "{} rankings:\n\n{}",
        kb.university,
        numbered(
            kb.rankings
                .iter()
                .map(|r| format!("{}: **{}**", r.agency, r.result))
        )
    )
}

pub fn benefits(kb: &KnowledgeBase) -> String {
    format!(
        "Why join a student organization?\n\n{}",
        bullet_groups(&kb.benefits)
    )
}

pub fn campus_life(kb: &KnowledgeBase) -> String {
    format!(
        "Life at {}:\n\n{}",
        kb.university,
        bullet_groups(&kb.campus_life)
    )
}

pub fn events_overview(kb: &KnowledgeBase) -> String {
    format!(
        "Flagship events at {}:\n\n{}\n\nAsk \"events now\" or \"upcoming events\" for the live schedule.",
        kb.university,
        numbered(
            kb.flagship_events
                .iter()
                .map(|e| format!("**{}**: {}", e.name, e.description))
        )
    )
}

pub fn admissions(kb: &KnowledgeBase) -> String {
    let admissions = &kb.admissions;
    let mut text = format!("**Admissions at {}**\n\n{}", kb.university, admissions.summary);
    if !admissions.steps.is_empty() {
        text.push_str(&format!("\n\nSteps:\n{}", numbered(&admissions.steps)));
    }
    if let Some(contact) = &admissions.contact {
        text.push_str(&format!("\n\nQuestions? Write to {}.", contact));
    }
    text
}

pub fn training_answer(example: &TrainingExample) -> String {
    if example.follow_ups.is_empty() {
        return example.answer.clone();
    }
    let follow_ups = example
        .follow_ups
        .iter()
        .map(|f| format!("- {}", f))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n\nYou might also ask:\n{}", example.answer, follow_ups)
}
