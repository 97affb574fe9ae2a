//! Test fixtures - reusable artifact content for tests.

/// Files of a three-file skill, relative to the skill directory
pub const PDF_SKILL: &[(&str, &str)] = &[
    ("SKILL.md", "# PDF\n\nExtract text and tables from PDF files.\n"),
    ("reference.md", "## Reference\n\nUse `extract.py <file>`.\n"),
    ("scripts/extract.py", "import sys\nprint(open(sys.argv[1], 'rb').read()[:10])\n"),
];

/// A single-file command
pub const REVIEW_COMMAND: &str = "---\ndescription: Review the current diff\n---\nReview the staged changes.\n";

/// A single-file agent
pub const PLANNER_AGENT: &str = "---\nname: planner\n---\nBreak the task into steps.\n";
