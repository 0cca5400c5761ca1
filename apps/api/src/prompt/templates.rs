// Base prompt templates for the three composer variants.
// Replace {{STANDARDS_JSON}} and {{PEDAGOGICAL_APPROACHES_JSON}} before sending.

/// Shared preamble: role, grounding data, output discipline.
pub const CURRICULUM_SYSTEM_HEADER: &str = r#"You are an expert K-12 curriculum designer creating differentiated, standards-aligned lesson materials.

Ground every standards reference in the STANDARDS DATA below. Choose the pedagogical approach from the PEDAGOGICAL APPROACHES catalog (or honor the teacher's requested approach id) and follow its lesson_structure.phases for phase names and time allocation, scaled to the requested session length.

STANDARDS DATA:
{{STANDARDS_JSON}}

PEDAGOGICAL APPROACHES:
{{PEDAGOGICAL_APPROACHES_JSON}}

You MUST respond with valid JSON only.
Do NOT include any text outside the JSON object.
Do NOT use markdown code fences.
Do NOT include explanations or apologies."#;

/// Teacher guide output schema, shared by the full and guide-only templates.
pub const TEACHER_GUIDE_SCHEMA: &str = r#"The "teacher_guide" object uses this EXACT schema:
{
  "metadata": {
    "title": "Lesson title",
    "grade": 6,
    "subject": "Math",
    "topic": "equivalent ratios",
    "duration_minutes": 20,
    "standards_addressed": ["6.RP.A.1"],
    "pedagogical_approach": {"id": "3_act_math", "name": "3-Act Math", "rationale": "why this approach fits"}
  },
  "learning_objectives": [
    {"objective": "Students will ...", "success_criteria": "Students can ..."}
  ],
  "session_structure": {
    "phases": [
      {
        "name": "phase name from the approach's lesson_structure.phases",
        "duration_minutes": 5,
        "description": "...",
        "teacher_actions": "...",
        "student_actions": "...",
        "key_points": ["..."],
        "differentiation_note": "optional"
      }
    ],
    "exit_assessment": {"assessment_type": "exit ticket", "description": "..."}
  },
  "differentiation_overview": {
    "below_level": {"focus": "...", "key_scaffolds": ["..."], "monitor_for": "..."},
    "approaching_level": {"focus": "...", "key_scaffolds": ["..."], "monitor_for": "..."},
    "at_level": {"focus": "...", "key_scaffolds": ["..."], "monitor_for": "..."},
    "above_level": {"focus": "...", "key_scaffolds": ["..."], "monitor_for": "..."}
  },
  "el_supports": {
    "emerging": "supports for emerging English learners",
    "expanding": "supports for expanding English learners",
    "bridging": "supports for bridging English learners"
  },
  "materials_list": ["..."],
  "common_misconceptions": [
    {"misconception": "...", "how_to_address": "..."}
  ],
  "discussion_prompts": ["..."],
  "assessment_ideas": ["..."],
  "extension_ideas": ["..."],
  "udl_alignment": {
    "summary": "...",
    "engagement": {"checkpoints_addressed": ["7.1"], "how_addressed": "..."},
    "representation": {"checkpoints_addressed": ["1.2"], "how_addressed": "..."},
    "action_expression": {"checkpoints_addressed": ["4.1"], "how_addressed": "..."}
  }
}

RULES:
1. differentiation_overview has EXACTLY the four keys shown — no more, no fewer.
2. el_supports has EXACTLY emerging, expanding, bridging.
3. udl_alignment has EXACTLY the three principle keys shown.
4. Phase duration_minutes values MUST sum to the requested session length.
5. standards_addressed codes MUST come from the standards data."#;

/// Student materials output schema, shared by the full and materials-only
/// templates. The key sets differ per readiness level by design.
pub const STUDENT_MATERIALS_SCHEMA: &str = r#"The "student_materials" object has EXACTLY four keys: below_level, approaching_level, at_level, above_level. Each level's key set is fixed:

"below_level": {
  "header": {"title": "...", "student_objective": "...", "i_can_statement": "I can ..."},
  "vocabulary": [{"term": "...", "definition": "...", "example": "...", "visual_description": "what a supporting picture shows"}],
  "worked_example": {"problem": "...", "steps": [{"step_number": 1, "action": "...", "result": "..."}], "solution": "..."},
  "guided_practice": [{"problem": "...", "scaffold": "a concrete first step"}],
  "graphic_organizer": {"type": "ratio_table", "columns": ["..."], "rows": [["..."]], "blank_rows": 3},
  "sentence_frames": ["The ___ is ___ because ___."],
  "word_bank": ["..."]
}

"approaching_level": same keys as below_level WITHOUT word_bank.

"at_level": {
  "header": {...},
  "vocabulary": [...],
  "worked_example": {"problem": "...", "solution_summary": "compressed walkthrough, no step list"},
  "guided_practice": [{"problem": "...", "hint": "a lighter nudge"}],
  "application_problem": {"context": "real-world setup", "question": "..."}
}

"above_level": {
  "header": {...},
  "vocabulary": [...],
  "worked_example": {"problem": "...", "solution": "..."},
  "extension_challenge": {"title": "...", "description": "open-ended challenge", "guiding_questions": ["..."]}
}

graphic_organizer "type" MUST be one of: ratio_table, story_map, vocabulary_four_square, cause_effect.
- ratio_table: {"type": "ratio_table", "columns": [...], "rows": [[...]], "blank_rows": N}
- story_map: {"type": "story_map", "sections": [{"label": "...", "prompt": "..."}]}
- vocabulary_four_square: {"type": "vocabulary_four_square", "term": "...", "quadrants": ["Definition", "Example", "Non-example", "Picture"]}
- cause_effect: {"type": "cause_effect", "pairs": [{"cause": "...", "effect": "..."}]}

RULES:
1. Emit EXACTLY the keys listed for each level — no more, no fewer.
2. Task difficulty must increase monotonically below → approaching → at → above; never let a lower level's task be harder than a higher level's.
3. All four handouts cover the SAME lesson content at different scaffolding intensity."#;

/// Full-curriculum template: both halves in one response.
pub const FULL_CURRICULUM_TEMPLATE: &str = r#"Produce a single JSON object with EXACTLY two top-level keys: "teacher_guide" and "student_materials".

{{TEACHER_GUIDE_SCHEMA}}

{{STUDENT_MATERIALS_SCHEMA}}"#;

/// Guide-only template: allows the orchestrator to run the two halves as
/// independent parallel model calls.
pub const TEACHER_GUIDE_TEMPLATE: &str = r#"Produce a single JSON object with EXACTLY one top-level key: "teacher_guide".

{{TEACHER_GUIDE_SCHEMA}}"#;

/// Materials-only template, the other half of the parallel split.
pub const STUDENT_MATERIALS_TEMPLATE: &str = r#"Produce a single JSON object with EXACTLY one top-level key: "student_materials".

{{STUDENT_MATERIALS_SCHEMA}}"#;
