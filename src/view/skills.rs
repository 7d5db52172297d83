/// First few skills of a list plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillPreview<'a> {
    pub shown: &'a [String],
    pub hidden: usize,
}

impl SkillPreview<'_> {
    pub fn render(&self, empty: &str) -> String {
        if self.shown.is_empty() {
            return match self.hidden {
                0 => empty.to_string(),
                n => format!("+{n} more"),
            };
        }
        let mut text = self.shown.join(", ");
        if self.hidden > 0 {
            text.push_str(&format!(" +{} more", self.hidden));
        }
        text
    }
}

pub fn preview_skills(skills: &[String], limit: usize) -> SkillPreview<'_> {
    let shown = &skills[..skills.len().min(limit)];
    SkillPreview {
        shown,
        hidden: skills.len() - shown.len(),
    }
}
