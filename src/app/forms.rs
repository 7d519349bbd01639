// ============================================================================
// Formulaires : connexion et inscription
// ============================================================================
// Chaque formulaire garde ses champs, le champ actif et la dernière erreur.
// validate() renvoie la commande à envoyer au worker, ou le message d'erreur
// à afficher sous le formulaire.
// ============================================================================

use crate::models::is_valid_email;
use crate::worker::AppCommand;

/// Champs du formulaire de connexion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

/// Formulaire de connexion
#[derive(Debug, Clone, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: LoginField::Email,
            error: None,
        }
    }
}

impl LoginForm {
    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn input_char(&mut self, c: char) {
        self.field_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.field_mut().pop();
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn previous_field(&mut self) {
        self.next_field();
    }

    /// Vérifie la saisie et prépare la commande de connexion
    pub fn validate(&mut self) -> Option<AppCommand> {
        let email = self.email.trim().to_string();
        if !is_valid_email(&email) {
            self.error = Some("Ce n'est pas une adresse e-mail valide.".to_string());
            return None;
        }

        self.error = None;
        Some(AppCommand::Login {
            email,
            password: self.password.clone(),
        })
    }
}

/// Champs du formulaire d'inscription, dans l'ordre de saisie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterField {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
    Terms,
}

impl RegisterField {
    pub const ALL: [RegisterField; 6] = [
        RegisterField::FirstName,
        RegisterField::LastName,
        RegisterField::Email,
        RegisterField::Password,
        RegisterField::ConfirmPassword,
        RegisterField::Terms,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RegisterField::FirstName => "Prénom",
            RegisterField::LastName => "Nom",
            RegisterField::Email => "E-mail",
            RegisterField::Password => "Mot de passe",
            RegisterField::ConfirmPassword => "Confirmation",
            RegisterField::Terms => "J'accepte les conditions d'utilisation",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, RegisterField::Password | RegisterField::ConfirmPassword)
    }
}

/// Formulaire d'inscription
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Coché par défaut
    pub accept_terms: bool,
    pub focus: RegisterField,
    pub error: Option<String>,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            accept_terms: true,
            focus: RegisterField::FirstName,
            error: None,
        }
    }
}

impl RegisterForm {
    /// Valeur texte d'un champ (None pour la case à cocher)
    pub fn value(&self, field: RegisterField) -> Option<&str> {
        match field {
            RegisterField::FirstName => Some(&self.first_name),
            RegisterField::LastName => Some(&self.last_name),
            RegisterField::Email => Some(&self.email),
            RegisterField::Password => Some(&self.password),
            RegisterField::ConfirmPassword => Some(&self.confirm_password),
            RegisterField::Terms => None,
        }
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            RegisterField::FirstName => Some(&mut self.first_name),
            RegisterField::LastName => Some(&mut self.last_name),
            RegisterField::Email => Some(&mut self.email),
            RegisterField::Password => Some(&mut self.password),
            RegisterField::ConfirmPassword => Some(&mut self.confirm_password),
            RegisterField::Terms => None,
        }
    }

    /// Espace sur la case à cocher : bascule, ailleurs : saisie
    pub fn input_char(&mut self, c: char) {
        match self.field_mut() {
            Some(field) => field.push(c),
            None if c == ' ' => self.accept_terms = !self.accept_terms,
            None => {}
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.field_mut() {
            field.pop();
        }
    }

    pub fn next_field(&mut self) {
        let index = RegisterField::ALL.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = RegisterField::ALL[(index + 1) % RegisterField::ALL.len()];
    }

    pub fn previous_field(&mut self) {
        let len = RegisterField::ALL.len();
        let index = RegisterField::ALL.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = RegisterField::ALL[(index + len - 1) % len];
    }

    /// Nom affiché : "Prénom Nom"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Vérifie la saisie dans l'ordre : mots de passe, e-mail, conditions
    pub fn validate(&mut self) -> Option<AppCommand> {
        let error = if self.password != self.confirm_password {
            Some("Les mots de passe ne correspondent pas.")
        } else if !is_valid_email(self.email.trim()) {
            Some("Ce n'est pas une adresse e-mail valide.")
        } else if !self.accept_terms {
            Some("Vous devez accepter les conditions d'utilisation.")
        } else {
            None
        };

        if let Some(message) = error {
            self.error = Some(message.to_string());
            return None;
        }

        self.error = None;
        Some(AppCommand::Register {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            display_name: self.display_name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(form: &mut RegisterForm, text: &str) {
        for c in text.chars() {
            form.input_char(c);
        }
    }

    #[test]
    fn test_login_rejects_bad_email() {
        let mut form = LoginForm {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
            ..LoginForm::default()
        };
        assert!(form.validate().is_none());
        assert!(form.error.is_some());

        form.email = "jane@example.com".to_string();
        assert_eq!(
            form.validate(),
            Some(AppCommand::Login {
                email: "jane@example.com".to_string(),
                password: "secret".to_string(),
            })
        );
        assert!(form.error.is_none());
    }

    #[test]
    fn test_login_typing_follows_focus() {
        let mut form = LoginForm::default();
        form.input_char('a');
        form.next_field();
        form.input_char('b');
        form.input_char('c');
        form.backspace();
        assert_eq!(form.email, "a");
        assert_eq!(form.password, "b");
    }

    #[test]
    fn test_register_validation_order() {
        let mut form = RegisterForm::default();
        type_text(&mut form, "Jane");
        form.next_field();
        type_text(&mut form, "Doe");
        form.next_field();
        type_text(&mut form, "bad");
        form.next_field();
        type_text(&mut form, "pw1");
        form.next_field();
        type_text(&mut form, "pw2");

        assert!(form.validate().is_none());
        assert_eq!(form.error.as_deref(), Some("Les mots de passe ne correspondent pas."));

        form.confirm_password = "pw1".to_string();
        assert!(form.validate().is_none());
        assert_eq!(form.error.as_deref(), Some("Ce n'est pas une adresse e-mail valide."));

        form.email = "jane@example.com".to_string();
        form.next_field();
        assert_eq!(form.focus, RegisterField::Terms);
        form.input_char(' ');
        assert!(!form.accept_terms);
        assert!(form.validate().is_none());

        form.input_char(' ');
        assert_eq!(
            form.validate(),
            Some(AppCommand::Register {
                email: "jane@example.com".to_string(),
                password: "pw1".to_string(),
                display_name: "Jane Doe".to_string(),
            })
        );
    }

    #[test]
    fn test_register_field_cycle() {
        let mut form = RegisterForm::default();
        form.previous_field();
        assert_eq!(form.focus, RegisterField::Terms);
        form.next_field();
        assert_eq!(form.focus, RegisterField::FirstName);
    }
}
