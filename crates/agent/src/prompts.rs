//! Prompt construction for the dialogue engine
//!
//! All prompts are French: the catalog and the user-facing replies
//! are French, with users writing in French, Standard Arabic, or
//! Tunisian dialect.

use telassist_catalog::Procedure;
use telassist_core::{conversation::transcript, Turn};

/// System prompt for intent classification.
pub const INTENT_SYSTEM: &str = "\
Tu es un assistant virtuel pour un opérateur télécom. Les clients écrivent en \
français, en arabe standard ou en dialecte tunisien. Détermine quelle procédure \
correspond à la demande. Réponds UNIQUEMENT avec un objet JSON de la forme \
{\"intent\": \"nom exact de la procédure ou unknown\", \"confidence\": 0.0, \
\"detected_language\": \"fr\"}. Aucune explication, aucun texte hors du JSON.";

/// Classification prompt enumerating candidate procedure names.
pub fn intent_prompt(input: &str, candidates: &[std::sync::Arc<Procedure>]) -> String {
    let names = candidates
        .iter()
        .map(|p| format!("- {}", p.name))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Demande utilisateur: \"{}\"\n\
         Procédures disponibles:\n{}\n\n\
         Quelle procédure correspond exactement à cette demande ? \
         Si aucune ne correspond, utilise \"unknown\".",
        input, names
    )
}

/// System prompt for joint slot extraction.
pub const EXTRACTION_SYSTEM: &str = "\
Tu extrais des informations d'une conversation avec un client d'un opérateur \
télécom. Réponds UNIQUEMENT avec un objet JSON dont les clés sont exactement \
les champs demandés. La valeur d'un champ est le texte trouvé dans la \
conversation, ou null si l'information n'y figure pas. N'invente jamais de \
valeur ni de clé.";

/// Extraction prompt over the whole turn history plus current input.
///
/// Enumerating the exact slot names and the procedure name reduces
/// hallucinated keys.
pub fn extraction_prompt(
    procedure: &Procedure,
    required_slots: &[&str],
    input: &str,
    history: &[Turn],
) -> String {
    let slots = required_slots
        .iter()
        .map(|s| format!("- \"{}\"", s))
        .collect::<Vec<_>>()
        .join("\n");

    let mut conversation = transcript(history);
    conversation.push_str(&format!("user: {}\n", input));

    let mut prompt = format!(
        "Procédure: {}\n\
         Champs à extraire (clés exactes du JSON):\n{}\n",
        procedure.name, slots
    );
    if !procedure.instructions().is_empty() {
        prompt.push_str(&format!("Consignes: {}\n", procedure.instructions()));
    }
    prompt.push_str(&format!("\nConversation:\n{}", conversation));
    prompt
}

/// System prompt for rendering a fallback question naturally.
pub const QUESTION_SYSTEM: &str = "\
Tu es un assistant d'un opérateur télécom. Reformule la question suivante en \
une seule phrase naturelle et polie en français, sans rien ajouter d'autre.";

pub fn question_prompt(raw_question: &str) -> String {
    format!("Question à reformuler: \"{}\"", raw_question)
}
