//! Prompt sent to the generator.
//!
//! The layout requested here is the one [`crate::parser::parse_recipe`] reads back.

/// Render the recipe-generation prompt.
///
/// Restriction and preference lines are only included when there is something to say,
/// so the same inputs always produce the same prompt.
pub fn render_recipe_prompt(
    ingredients: &[String],
    restrictions: &[String],
    preferences: &str,
) -> String {
    let mut prompt = format!(
        "Genera una receta con los siguientes ingredientes: {}.\n",
        ingredients.join(", ")
    );

    if !restrictions.is_empty() {
        prompt.push_str(&format!(
            "Restricciones dietéticas: {}.\n",
            restrictions.join(", ")
        ));
    }

    let preferences = preferences.trim();
    if !preferences.is_empty() {
        prompt.push_str(&format!("Preferencias: {}.\n", preferences));
    }

    prompt.push_str(
        r#"
Responde únicamente con la receta, usando exactamente este formato:

**Título:** [Nombre de la receta]
**Ingredientes:**
- [Ingrediente 1]
- [Ingrediente 2]
**Instrucciones:**
1. [Paso 1]
2. [Paso 2]
"#,
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_recipe;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_prompt() {
        let prompt = render_recipe_prompt(&strings(&["pollo", "arroz"]), &[], "");

        assert!(prompt.contains("pollo, arroz"));
        assert!(prompt.contains("**Título:**"));
        assert!(prompt.contains("**Ingredientes:**"));
        assert!(prompt.contains("**Instrucciones:**"));
        assert!(!prompt.contains("Restricciones"));
        assert!(!prompt.contains("Preferencias"));
    }

    #[test]
    fn test_render_prompt_with_restrictions_and_preferences() {
        let prompt = render_recipe_prompt(
            &strings(&["tofu"]),
            &strings(&["vegano", "sin gluten"]),
            "  algo picante ",
        );

        assert!(prompt.contains("Restricciones dietéticas: vegano, sin gluten."));
        assert!(prompt.contains("Preferencias: algo picante."));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = render_recipe_prompt(&strings(&["a", "b"]), &strings(&["c"]), "d");
        let b = render_recipe_prompt(&strings(&["a", "b"]), &strings(&["c"]), "d");
        assert_eq!(a, b);
    }

    #[test]
    fn test_format_template_parses_as_placeholders() {
        // The template block alone is a valid (if generic) recipe for the parser.
        let prompt = render_recipe_prompt(&strings(&["x"]), &[], "");
        let draft = parse_recipe(&prompt);
        assert_eq!(draft.title, "[Nombre de la receta]");
        assert_eq!(draft.ingredients, vec!["[Ingrediente 1]", "[Ingrediente 2]"]);
        assert_eq!(draft.instructions, vec!["[Paso 1]", "[Paso 2]"]);
    }
}
