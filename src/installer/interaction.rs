//! Interactive-block conversion for Cursor.
//!
//! Cursor has no AskUserQuestion tool, so workflow documents that stage
//! multi-option prompts are rewritten into `<cursor_interaction>` blocks its
//! agent can follow with AskQuestion. Each registered rule carries a regex
//! marker anchored to the upstream wording; the marker locates the span to
//! replace and the rule supplies either a filled gate template or a bespoke
//! block. A marker that no longer matches is reported to the caller instead
//! of silently leaving the document unconverted.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

const CONFIDENCE_GATE: &str = r#"
<cursor_interaction type="confidence_gate" id="{gate_id}">
IMPORTANT: You MUST use the AskQuestion tool here. Do NOT proceed without user input.

Present the following to the user via AskQuestion:
- Context: {what_was_just_completed}
- Options: {confidence_options}
- Wait for response before continuing

Based on user's choice:
- If "{option_a}": {action_a}
- If "{option_b}": {action_b}
- If user provides custom input: incorporate their guidance and proceed accordingly
</cursor_interaction>"#;

const DECISION_GATE: &str = r#"
<cursor_interaction type="decision_gate" id="{gate_id}">
IMPORTANT: You MUST use the AskQuestion tool here. Do NOT proceed without user input.

Present the following choice to the user via AskQuestion:
- Context: {decision_context}
- Options:
  1. {option_1} — {description_1}
  2. {option_2} — {description_2}
  {option_3_line}
- Wait for response before continuing

Route based on user's choice:
- "{option_1}": {action_1}
- "{option_2}": {action_2}
- Custom input: {fallback_action}
</cursor_interaction>"#;

const CONTINUATION_GATE: &str = r#"
<cursor_interaction type="continuation_gate" id="{gate_id}">
IMPORTANT: You MUST use the AskQuestion tool here. Do NOT proceed without user input.

Ask the user via AskQuestion:
- Context: {current_state_summary}
- Options:
  1. {proceed_option} — {proceed_description}
  2. {continue_option} — {continue_description}
- Wait for response before continuing

If "{continue_option}": loop back to {loop_target_step}
If "{proceed_option}": continue to next step
</cursor_interaction>"#;

const ACTION_GATE: &str = r#"
<cursor_interaction type="action_gate" id="{gate_id}">
IMPORTANT: You MUST use the AskQuestion tool here. Do NOT proceed without user input.

Present available actions to the user via AskQuestion:
- Context: {action_context}
- Options:
  1. {action_1} — {description_1}
  2. {action_2} — {description_2}
  3. {action_3} — {description_3}
  {action_4_line}
- Wait for response before continuing

Execute the user's chosen action:
- "{action_1}": {execute_1}
- "{action_2}": {execute_2}
- "{action_3}": {execute_3}
- Custom input: {fallback_action}
</cursor_interaction>"#;

const DISCUSS_DEEP_DIVE_BLOCK: &str = r#"
<cursor_interaction type="deep_dive" id="discuss-area-questioning">
IMPORTANT: For EACH selected gray area, you MUST conduct a focused discussion using AskQuestion.

For each area in the selected list:
  1. Ask 4 specific decision questions about this area using AskQuestion
     - Each question should have 2-3 concrete options
     - Include a "You decide" option when the decision is genuinely discretionary
     - Wait for each response before asking the next question
  2. After all 4 questions for an area, use AskQuestion to ask:
     - "More questions about {area_name}?" / "Move to next area" / "Done discussing"
  3. If "More questions": ask additional questions about this area
  4. If "Move to next area": proceed to the next selected area
  5. If "Done discussing": stop discussion, move to CONTEXT.md creation

Record every user decision. Each answer populates a decision record in CONTEXT.md.
Do NOT skip areas. Do NOT proceed to CONTEXT.md creation until the user says "Done" or all areas are covered.
</cursor_interaction>"#;

const SETTINGS_CONFIG_BLOCK: &str = r#"
<cursor_interaction type="configuration_chain" id="settings-configuration">
IMPORTANT: You MUST ask ALL configuration questions using AskQuestion, one at a time. Do NOT skip any.

Ask each question in sequence via AskQuestion. Wait for each response before asking the next.

1. Per-Agent Model Configuration:
   For each of the 11 agent roles, present available models and let the user select:
   - bp-planner, bp-executor, bp-verifier, bp-debugger, bp-codebase-mapper
   - bp-phase-researcher, bp-project-researcher, bp-research-synthesizer
   - bp-roadmapper, bp-plan-checker, bp-integration-checker

2. Plan Researcher (research before planning):
   - "Yes" — Run phase researcher before planner
   - "No" — Skip research, plan from existing context

3. Plan Checker (verify plans after creation):
   - "Yes" — Run plan checker after planner
   - "No" — Skip plan verification

4. Execution Verifier (verify after execution):
   - "Yes" — Run verifier after executor
   - "No" — Skip execution verification

5. Git Branching Strategy:
   - "None (Recommended)" — All work on current branch
   - "Per Phase" — Create branch per phase
   - "Per Milestone" — Create branch per milestone

After all responses are collected, write the configuration to .blueprint/config.json with both agent_models and workflow settings.
</cursor_interaction>"#;

const DEBUG_SYMPTOMS_BLOCK: &str = r#"
<cursor_interaction type="symptom_gathering" id="debug-symptoms">
IMPORTANT: You MUST ask ALL 5 diagnostic questions using AskQuestion, one at a time. Do NOT skip any. Do NOT start debugging until all 5 are answered.

Ask each question in sequence via AskQuestion:

1. Expected behavior: "What should happen? Describe the correct behavior."
   (Freeform response — no predefined options)

2. Actual behavior: "What happens instead? Describe what you observe."
   (Freeform response)

3. Error messages: "Are there any error messages? Paste or describe them."
   (Freeform response — "None" is valid)

4. Timeline: "When did this start? Has it ever worked correctly?"
   (Freeform response)

5. Reproduction: "How do you trigger this issue? What steps reproduce it?"
   (Freeform response)

After collecting all 5 responses, populate the debug session file at .blueprint/debug/{slug}.md with the gathered information, then proceed to hypothesis formation.
</cursor_interaction>"#;

/// What a matched marker gets replaced with
enum RuleAction {
    /// A gate template filled with the rule's placeholder values
    Gate {
        template: &'static str,
        params: &'static [(&'static str, &'static str)],
    },
    /// A fixed replacement block
    Bespoke(&'static str),
}

struct InteractionRule {
    id: &'static str,
    marker: &'static str,
    action: RuleAction,
}

/// Registered conversions, keyed by source path relative to the content root
/// (`workflows/...` inside the docs tree, or `commands/bp/...`).
static INTERACTION_MAP: &[(&str, &[InteractionRule])] = &[
    (
        "workflows/discovery-phase.md",
        &[InteractionRule {
            id: "discovery-confidence",
            marker: r#"(?s)If confidence is LOW:\nUse AskUserQuestion:.*?- "Pause" - I need to think about this"#,
            action: RuleAction::Gate {
                template: CONFIDENCE_GATE,
                params: &[
                    ("gate_id", "discovery-confidence"),
                    ("what_was_just_completed", "Discovery research completed but confidence is LOW"),
                    ("confidence_options", "\"Dig deeper\" to do more research, or \"Proceed anyway\" to accept uncertainty"),
                    ("option_a", "Dig deeper"),
                    ("action_a", "Do more research before planning"),
                    ("option_b", "Proceed anyway"),
                    ("action_b", "Accept uncertainty, plan with caveats"),
                ],
            },
        }],
    ),
    (
        "workflows/discuss-phase.md",
        &[
            InteractionRule {
                id: "discuss-check-existing",
                marker: r#"(?s)\*\*If exists:\*\*\nUse AskUserQuestion:.*?If "Skip": Exit workflow"#,
                action: RuleAction::Gate {
                    template: DECISION_GATE,
                    params: &[
                        ("gate_id", "discuss-check-existing"),
                        ("decision_context", "Phase already has existing context (CONTEXT.md found)"),
                        ("option_1", "Update it"),
                        ("description_1", "Review and revise existing context"),
                        ("option_2", "View it"),
                        ("description_2", "Show me what's there"),
                        ("option_3_line", "3. Skip — Use existing context as-is"),
                        ("action_1", "Load existing context, continue to analyze_phase"),
                        ("action_2", "Display CONTEXT.md, then offer update/skip"),
                        ("fallback_action", "Exit workflow (treat as skip)"),
                    ],
                },
            },
            InteractionRule {
                id: "discuss-deep-dive",
                marker: r#"(?s)\*\*Then use AskUserQuestion \(multiSelect: true\):\*\*.*?Continue to discuss_areas with selected areas\.\n</step>\n\n<step name="discuss_areas">.*?Track deferred ideas internally\.\n</step>"#,
                action: RuleAction::Bespoke(DISCUSS_DEEP_DIVE_BLOCK),
            },
            InteractionRule {
                id: "discuss-verify-context",
                marker: r#"(?s)AskUserQuestion:\n- header: "Context"\n- question: "Does this accurately capture what you described\?"\n- options:.*?- "Review full file" — Show me the raw file first"#,
                action: RuleAction::Gate {
                    template: CONFIDENCE_GATE,
                    params: &[
                        ("gate_id", "discuss-verify-context"),
                        ("what_was_just_completed", "CONTEXT.md has been created with your implementation decisions"),
                        ("confidence_options", "\"Approve\" to proceed, \"Corrections\" to change things, or \"Review full file\" to see the raw file"),
                        ("option_a", "Approve"),
                        ("action_a", "Proceed to git commit"),
                        ("option_b", "Corrections"),
                        ("action_b", "Ask what to change, apply edits, re-present for approval"),
                    ],
                },
            },
        ],
    ),
    (
        "workflows/quick.md",
        &[InteractionRule {
            id: "quick-task-description",
            marker: r#"AskUserQuestion\(\n\s*header: "Quick Task",\n\s*question: "What do you want to do\?",\n\s*followUp: null\n\)"#,
            action: RuleAction::Gate {
                template: ACTION_GATE,
                params: &[
                    ("gate_id", "quick-task-description"),
                    ("action_context", "Starting a quick task — need task description"),
                    ("action_1", "Describe your task"),
                    ("description_1", "Type what you want to do (freeform)"),
                    ("action_2", "Cancel"),
                    ("description_2", "Exit quick task mode"),
                    ("action_3", "View recent tasks"),
                    ("description_3", "See previously completed quick tasks"),
                    ("action_4_line", ""),
                    ("execute_1", "Store response as task description and proceed to initialization"),
                    ("execute_2", "Exit workflow"),
                    ("execute_3", "Show quick task history from STATE.md"),
                    ("fallback_action", "Use input as the task description"),
                ],
            },
        }],
    ),
    (
        "workflows/add-todo.md",
        &[InteractionRule {
            id: "add-todo-duplicate",
            marker: r#"(?s)If overlapping, use AskUserQuestion:.*?- "Add anyway" — create as separate todo"#,
            action: RuleAction::Gate {
                template: DECISION_GATE,
                params: &[
                    ("gate_id", "add-todo-duplicate"),
                    ("decision_context", "A similar todo already exists"),
                    ("option_1", "Skip"),
                    ("description_1", "Keep existing todo"),
                    ("option_2", "Replace"),
                    ("description_2", "Update existing with new context"),
                    ("option_3_line", "3. Add anyway — Create as separate todo"),
                    ("action_1", "Keep existing todo, exit without creating new one"),
                    ("action_2", "Update existing todo file with new context"),
                    ("fallback_action", "Create as separate todo alongside existing one"),
                ],
            },
        }],
    ),
    (
        "workflows/settings.md",
        &[InteractionRule {
            id: "settings-configuration",
            marker: r#"(?s)Use AskUserQuestion with current values pre-selected:.*?\]\)\n```"#,
            action: RuleAction::Bespoke(SETTINGS_CONFIG_BLOCK),
        }],
    ),
    (
        "workflows/complete-milestone.md",
        &[InteractionRule {
            id: "complete-milestone-branches",
            marker: r#"(?s)AskUserQuestion with options: Squash merge.*?Keep branches\."#,
            action: RuleAction::Gate {
                template: ACTION_GATE,
                params: &[
                    ("gate_id", "complete-milestone-branches"),
                    ("action_context", "Git branches detected for completed milestone. Choose how to handle them."),
                    ("action_1", "Squash merge (Recommended)"),
                    ("description_1", "Merge branches into main with a single squash commit"),
                    ("action_2", "Merge with history"),
                    ("description_2", "Merge branches preserving full commit history"),
                    ("action_3", "Delete without merging"),
                    ("description_3", "Remove branches (already merged or not needed)"),
                    ("action_4_line", "4. Keep branches — Leave for manual handling"),
                    ("execute_1", "Squash merge each branch into main"),
                    ("execute_2", "Merge each branch with --no-ff into main"),
                    ("execute_3", "Delete the branch(es)"),
                    ("fallback_action", "Report \"Branches preserved for manual handling\""),
                ],
            },
        }],
    ),
    (
        "workflows/new-project.md",
        &[
            InteractionRule {
                id: "new-project-brownfield",
                marker: r#"(?s)Use AskUserQuestion:\n- header: "Existing Code".*?- "Skip mapping" — Proceed with project initialization"#,
                action: RuleAction::Gate {
                    template: DECISION_GATE,
                    params: &[
                        ("gate_id", "new-project-brownfield"),
                        ("decision_context", "Existing code detected in this directory but no codebase map exists"),
                        ("option_1", "Map codebase first"),
                        ("description_1", "Run /bp:map-codebase to understand existing architecture (Recommended)"),
                        ("option_2", "Skip mapping"),
                        ("description_2", "Proceed with project initialization"),
                        ("option_3_line", ""),
                        ("action_1", "Exit and run /bp:map-codebase first, then return to /bp:new-project"),
                        ("action_2", "Continue with project initialization without codebase mapping"),
                        ("fallback_action", "Continue with project initialization"),
                    ],
                },
            },
            InteractionRule {
                id: "new-project-ready",
                marker: r#"(?s)When you could write a clear PROJECT\.md, use AskUserQuestion:.*?- "Keep exploring" — I want to share more / ask me more"#,
                action: RuleAction::Gate {
                    template: CONTINUATION_GATE,
                    params: &[
                        ("gate_id", "new-project-ready"),
                        ("current_state_summary", "Deep questioning phase — enough context gathered to write PROJECT.md"),
                        ("proceed_option", "Create PROJECT.md"),
                        ("proceed_description", "Let's move forward with what we have"),
                        ("continue_option", "Keep exploring"),
                        ("continue_description", "I want to share more / ask me more"),
                        ("loop_target_step", "deep questioning (ask what they want to add, or identify gaps and probe naturally)"),
                    ],
                },
            },
        ],
    ),
    (
        "workflows/new-milestone.md",
        &[InteractionRule {
            id: "new-milestone-staleness",
            marker: r#"(?s)Present to the user via `AskUserQuestion`:.*?\*\*Options:\*\*\n1\. \*\*Full remap\*\*.*?2\. \*\*Skip\*\* — Continue with current codebase docs"#,
            action: RuleAction::Gate {
                template: DECISION_GATE,
                params: &[
                    ("gate_id", "new-milestone-staleness"),
                    ("decision_context", "Codebase mapping may be stale — significant changes since last mapping"),
                    ("option_1", "Full remap"),
                    ("description_1", "Re-run all 4 mapping agents (recommended if significant structural changes)"),
                    ("option_2", "Skip"),
                    ("description_2", "Continue with current codebase docs"),
                    ("option_3_line", ""),
                    ("action_1", "Spawn 4 bp-codebase-mapper agents in parallel and update mapping metadata"),
                    ("action_2", "Continue to the next step with existing codebase docs"),
                    ("fallback_action", "Continue with existing codebase docs"),
                ],
            },
        }],
    ),
    (
        "workflows/check-todos.md",
        &[InteractionRule {
            id: "check-todos-action",
            marker: r#"(?s)Use AskUserQuestion:\n- header: "Action"\n- question: "This todo relates to Phase.*?"Put it back" — return to list"#,
            action: RuleAction::Gate {
                template: ACTION_GATE,
                params: &[
                    ("gate_id", "check-todos-action"),
                    ("action_context", "Todo selected — choose what to do with it"),
                    ("action_1", "Work on it now"),
                    ("description_1", "Move to done, start working"),
                    ("action_2", "Add to phase plan"),
                    ("description_2", "Include when planning the related phase"),
                    ("action_3", "Brainstorm approach"),
                    ("description_3", "Think through before deciding"),
                    ("action_4_line", "4. Put it back — Return to list"),
                    ("execute_1", "Move todo to done/ directory, update STATE.md, begin work"),
                    ("execute_2", "Note todo reference in phase planning notes, keep in pending"),
                    ("execute_3", "Keep in pending, start discussion about problem and approaches"),
                    ("fallback_action", "Return to todo list"),
                ],
            },
        }],
    ),
    (
        "commands/bp/debug.md",
        &[InteractionRule {
            id: "debug-symptoms",
            marker: r#"(?s)## 2\. Gather Symptoms \(if new issue\)\n\nUse AskUserQuestion for each:.*?After all gathered, confirm ready to investigate\."#,
            action: RuleAction::Bespoke(DEBUG_SYMPTOMS_BLOCK),
        }],
    ),
];

struct CompiledRule {
    rule: &'static InteractionRule,
    marker: Regex,
}

static COMPILED_MAP: LazyLock<Vec<(&'static str, Vec<CompiledRule>)>> = LazyLock::new(|| {
    INTERACTION_MAP
        .iter()
        .map(|(path, rules)| {
            let compiled = rules
                .iter()
                .map(|rule| CompiledRule {
                    rule,
                    marker: Regex::new(rule.marker).unwrap(),
                })
                .collect();
            (*path, compiled)
        })
        .collect()
});

static ASK_USER_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bAskUserQuestion\b").unwrap());

fn fill_template(template: &str, params: &[(&str, &str)]) -> String {
    let mut filled = template.to_string();
    for (key, value) in params {
        filled = filled.replace(&format!("{{{key}}}"), value);
    }
    filled
}

/// Apply the registered conversions for a file.
///
/// `relative_path` is the source path relative to the content root; a
/// leading `blueprint/` segment is stripped before lookup. Returns the
/// converted content and the ids of rules whose marker found no match.
/// Documents without registered rules still get the generic
/// AskUserQuestion rename.
pub fn apply(content: &str, relative_path: &str) -> (String, Vec<&'static str>) {
    let normalized = relative_path
        .strip_prefix("blueprint/")
        .unwrap_or(relative_path);

    let rules = COMPILED_MAP
        .iter()
        .find(|(path, _)| *path == normalized)
        .map(|(_, rules)| rules.as_slice())
        .unwrap_or(&[]);

    let mut result = content.to_string();
    let mut misses: Vec<&'static str> = Vec::new();

    for compiled in rules {
        if !compiled.marker.is_match(&result) {
            misses.push(compiled.rule.id);
            continue;
        }
        let replacement = match &compiled.rule.action {
            RuleAction::Bespoke(block) => (*block).to_string(),
            RuleAction::Gate { template, params } => fill_template(template, params),
        };
        result = compiled
            .marker
            .replace(&result, NoExpand(&replacement))
            .into_owned();
    }

    let result = ASK_USER_QUESTION
        .replace_all(&result, "AskQuestion")
        .into_owned();

    (result, misses)
}
