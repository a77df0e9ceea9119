//! Prompt templates and canned fallback replies, one per intake step.

use super::recommend::recommendations_for;
use super::state::{IntakeStep, SessionState};

/// System prompt establishing the assistant persona.
pub fn system_prompt() -> &'static str {
    "Eres un asistente amigable llamado 'Digi' que recopila información del \
     cliente para una agencia digital. Responde siempre en español, de forma \
     natural y breve (1-3 frases). Haz una sola pregunta a la vez."
}

/// Build the per-turn instruction for the step the session just entered —
/// the reply it produces acknowledges the previous answer and asks the
/// entered step's question (for `Complete`, it closes the conversation).
///
/// Embeds the accumulated profile so every call is stateless on the
/// provider's side — the prompt carries all needed context.
pub fn turn_prompt(state: &SessionState, entered: IntakeStep) -> String {
    let mut profile = String::new();
    for (label, value) in [
        ("nombre", &state.name),
        ("email", &state.email),
        ("tipo de negocio", &state.business_type),
        ("necesidades", &state.needs),
    ] {
        if !value.is_empty() {
            profile.push_str(&format!("- {label}: {value}\n"));
        }
    }
    let profile_section = if profile.is_empty() {
        String::new()
    } else {
        format!("Datos del cliente hasta ahora:\n{profile}")
    };

    let instruction = match entered {
        IntakeStep::AwaitingName => {
            "Saluda al visitante y pregúntale su nombre.".to_string()
        }
        IntakeStep::AwaitingEmail => format!(
            "El cliente acaba de decir que se llama {}. Dale la bienvenida por \
             su nombre y pídele su email de contacto.",
            state.name
        ),
        IntakeStep::AwaitingBusinessType => format!(
            "El cliente acaba de dar su email ({}). Agradécele y pregúntale qué \
             tipo de negocio tiene (por ejemplo restaurante, tienda o servicios).",
            state.email
        ),
        IntakeStep::AwaitingNeeds => format!(
            "El cliente tiene un negocio de tipo '{}'. Pregúntale qué necesita \
             para su negocio (web, marketing, automatización, etc.).",
            state.business_type
        ),
        IntakeStep::Complete => {
            let recs = recommendations_for(&state.business_type).join(", ");
            format!(
                "El cliente acaba de describir sus necesidades: '{}'. Agradécele, \
                 confirma que hemos registrado sus datos y que pronto le \
                 contactaremos. Puedes mencionar servicios como: {recs}.",
                state.needs
            )
        }
    };

    format!("{profile_section}{instruction}")
}

/// Deterministic canned reply for the step just entered, used when generation
/// fails so the conversation can always continue.
pub fn fallback_reply(state: &SessionState, entered: IntakeStep) -> String {
    match entered {
        IntakeStep::AwaitingName => {
            "¡Hola! Soy tu asistente digital. ¿Cuál es tu nombre?".to_string()
        }
        IntakeStep::AwaitingEmail => {
            format!("¡Gracias, {}! ¿Cuál es tu email de contacto?", state.name)
        }
        IntakeStep::AwaitingBusinessType => {
            "Perfecto. ¿Qué tipo de negocio tienes?".to_string()
        }
        IntakeStep::AwaitingNeeds => {
            "¡Genial! Cuéntame, ¿qué necesitas para tu negocio?".to_string()
        }
        IntakeStep::Complete => {
            let recs = recommendations_for(&state.business_type).join(", ");
            format!(
                "¡Gracias, {}! Hemos registrado tus datos y pronto te \
                 contactaremos. Para tu negocio te recomendamos: {recs}.",
                state.name
            )
        }
    }
}

/// Re-prompt when the name is empty.
pub const REPROMPT_NAME: &str = "¿Me dices tu nombre, por favor?";

/// Re-prompt when the email lacks an `@`.
pub const REPROMPT_EMAIL: &str = "Por favor, ingresa un email válido.";

/// Re-prompt when the business type is empty.
pub const REPROMPT_BUSINESS_TYPE: &str = "¿Qué tipo de negocio tienes?";

/// Fixed acknowledgment once the intake is complete.
pub const CLOSING_REPLY: &str = "Gracias, ya tenemos tus datos. ¡Pronto te contactaremos!";

/// Appended to the terminal reply when the lead could not be saved.
pub const SAVE_APOLOGY: &str = "\nHubo un error guardando los datos.";

/// Stored in place of empty needs.
pub const NEEDS_UNSPECIFIED: &str = "no especificado";
