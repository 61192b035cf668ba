//! Slot-filling question selection
//!
//! Known slots map to fixed French questions; unknown slots get a
//! templated fallback that the gateway may rephrase.

/// Static slot-name -> question table, matched by case-insensitive
/// substring on the slot name.
const QUESTION_TEMPLATES: &[(&str, &str)] = &[
    (
        "type d'offre souhaitée",
        "Quel type d'offre internet souhaitez-vous ? (Fibre, ADSL, ou Box 5G)",
    ),
    ("adresse du domicile", "Quelle est votre adresse complète ?"),
    (
        "mode de paiement",
        "Quel mode de paiement préférez-vous ? (Carte bancaire, prélèvement automatique, etc.)",
    ),
    ("type de client", "Êtes-vous un particulier ou une entreprise ?"),
    ("numéro de la ligne", "Quel est le numéro de la ligne concernée ?"),
    (
        "volume à transférer",
        "Quel volume de données souhaitez-vous transférer ? (en Mo ou Go)",
    ),
    (
        "identité du titulaire",
        "Pouvez-vous confirmer l'identité du titulaire de la ligne ?",
    ),
];

/// Look up the fixed question for a slot, if one exists.
pub fn template_for(slot: &str) -> Option<&'static str> {
    let slot_lower = slot.to_lowercase();
    QUESTION_TEMPLATES
        .iter()
        .find(|(key, _)| slot_lower.contains(&key.to_lowercase()) || key.to_lowercase().contains(&slot_lower))
        .map(|(_, question)| *question)
}

/// Raw fallback question for slots without a template. Always safe to
/// show to the user as-is.
pub fn fallback_question(procedure_name: &str, slot: &str) -> String {
    format!(
        "Pour continuer avec '{}', j'ai besoin de connaître : {}. Pouvez-vous me le fournir ?",
        procedure_name, slot
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_slot_matches() {
        assert!(template_for("adresse du domicile").unwrap().contains("adresse"));
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        assert!(template_for("Type De Client").is_some());
        assert!(template_for("le type d'offre souhaitée par le client").is_some());
    }

    #[test]
    fn test_unknown_slot_has_no_template() {
        assert!(template_for("numéro de série du routeur").is_none());
    }

    #[test]
    fn test_fallback_mentions_slot_and_procedure() {
        let q = fallback_question("Transfert de ligne", "identité du demandeur");
        assert!(q.contains("Transfert de ligne"));
        assert!(q.contains("identité du demandeur"));
    }
}
