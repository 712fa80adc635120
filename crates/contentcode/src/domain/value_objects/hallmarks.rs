//! Rubric texts given to the model for each essay family

/// Hallmarks of humility, used for the conflict/angry and award essays
pub const HUMILITY_HALLMARKS: &str = "\
Hallmarks of humility:
1. An accurate view of oneself: acknowledging one's own strengths and limitations without exaggeration or self-deprecation.
2. Openness to other perspectives: willingness to consider that others may be right and to learn from them.
3. Other-orientation: attention to the needs, feelings and contributions of other people rather than to oneself.
4. Low self-focus: little concern with status, credit, entitlement or self-promotion.
5. Appreciation of others: giving credit and gratitude to the people and circumstances that contributed to an outcome.
6. Accountability: owning one's mistakes and responsibility for a situation, and seeking to repair harm.
";

/// Hallmarks of spirituality, used for the dream and deja vu essays
pub const SPIRITUALITY_HALLMARKS: &str = "\
Hallmarks of spirituality:
1. Transcendence: belief in a reality, presence or meaning beyond the material and the self.
2. Connectedness: a sense of deep connection with other people, the deceased, nature or a higher power.
3. Meaning-making: interpreting the experience as purposeful, significant or carrying a message.
4. Openness to the sacred: acceptance of supernatural, religious or mystical explanations for the experience.
";
