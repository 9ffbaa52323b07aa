// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_LANG: &str = "en";

// (chave, pt, es, en)
const MESSAGES: &[(&str, &str, &str, &str)] = &[
    ("validation_failed", "Um ou mais campos são inválidos.", "Uno o más campos no son válidos.", "One or more fields are invalid."),
    ("required", "Campo obrigatório.", "Campo obligatorio.", "This field is required."),
    ("invalid_email", "O e-mail fornecido é inválido.", "El correo electrónico no es válido.", "The e-mail address is invalid."),
    ("password_too_short", "A senha deve ter no mínimo 6 caracteres.", "La contraseña debe tener al menos 6 caracteres.", "The password must have at least 6 characters."),
    ("name_too_short", "O nome deve ter no mínimo 2 caracteres.", "El nombre debe tener al menos 2 caracteres.", "The name must have at least 2 characters."),
    ("too_long", "Texto muito longo.", "Texto demasiado largo.", "Text is too long."),
    ("invalid_cycle", "Ciclo inválido.", "Ciclo no válido.", "Invalid cycle."),
    ("invalid_amount", "O valor deve ser maior que zero.", "El monto debe ser mayor que cero.", "The amount must be greater than zero."),
    ("email_already_exists", "Este e-mail já está em uso.", "Este correo ya está en uso.", "This e-mail is already in use."),
    ("invalid_credentials", "E-mail ou senha inválidos.", "Correo o contraseña no válidos.", "Invalid e-mail or password."),
    ("invalid_token", "Token de autenticação inválido ou ausente.", "Token de autenticación no válido o ausente.", "Missing or invalid authentication token."),
    ("forbidden", "Você não tem permissão para realizar esta ação.", "No tiene permiso para realizar esta acción.", "You are not allowed to perform this action."),
    ("user_not_found", "Usuário não encontrado.", "Usuario no encontrado.", "User not found."),
    ("member_not_found", "Membro não encontrado.", "Miembro no encontrado.", "Member not found."),
    ("anexo_not_found", "Anexo não encontrado.", "Anexo no encontrado.", "Anexo not found."),
    ("ministry_not_found", "Ministério não encontrado.", "Ministerio no encontrado.", "Ministry not found."),
    ("event_not_found", "Evento não encontrado.", "Evento no encontrado.", "Event not found."),
    ("transaction_not_found", "Lançamento não encontrado.", "Transacción no encontrada.", "Transaction not found."),
    ("intercession_log_not_found", "Registro de intercessão não encontrado.", "Registro de intercesión no encontrado.", "Intercession log not found."),
    ("trip_not_found", "Viagem missionária não encontrada.", "Viaje misionero no encontrado.", "Mission trip not found."),
    ("participant_not_found", "Participante não encontrado.", "Participante no encontrado.", "Participant not found."),
    ("enrollment_not_found", "Matrícula não encontrada.", "Inscripción no encontrada.", "Enrollment not found."),
    ("participant_not_approved", "Só participantes aprovados podem ter presença marcada.", "Solo participantes aprobados pueden marcar asistencia.", "Only approved participants can be marked as attended."),
    ("duplicate_record", "Registro duplicado.", "Registro duplicado.", "Duplicate record."),
    ("invalid_reference", "Referência inválida a outro registro.", "Referencia no válida a otro registro.", "Invalid reference to another record."),
    ("internal_error", "Ocorreu um erro inesperado.", "Ocurrió un error inesperado.", "An unexpected error occurred."),
];

/// Catálogo de mensagens traduzidas, indexado por idioma e chave.
#[derive(Clone)]
pub struct I18nStore {
    messages: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages: HashMap<&'static str, HashMap<&'static str, &'static str>> = HashMap::new();

        for &(key, pt, es, en) in MESSAGES {
            messages.entry("pt").or_default().insert(key, pt);
            messages.entry("es").or_default().insert(key, es);
            messages.entry("en").or_default().insert(key, en);
        }

        Self { messages: Arc::new(messages) }
    }

    /// Busca no idioma pedido, depois no padrão; se nada achar devolve a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANG, key))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&'static str> {
        self.messages.get(lang).and_then(|m| m.get(key)).copied()
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_languages() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "member_not_found"), "Membro não encontrado.");
        assert_eq!(store.translate("es", "member_not_found"), "Miembro no encontrado.");
        assert_eq!(store.translate("en", "member_not_found"), "Member not found.");
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let store = I18nStore::new();
        assert_eq!(store.translate("de", "forbidden"), "You are not allowed to perform this action.");
    }

    #[test]
    fn unknown_key_is_returned_as_is() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "no_such_key"), "no_such_key");
    }
}
