//! Text buffers behind the modal forms.

use fondos_core::{SubscribeForm, TransactionForm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
    /// Behaves like a number input: only numeric characters are accepted.
    pub numeric: bool,
    pub readonly: bool,
}

impl Field {
    fn text(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            numeric: false,
            readonly: false,
        }
    }

    fn number(label: &'static str) -> Self {
        Self {
            numeric: true,
            ..Self::text(label)
        }
    }

    fn fixed(label: &'static str, value: &str) -> Self {
        Self {
            value: value.to_string(),
            readonly: true,
            ..Self::text(label)
        }
    }

    fn accepts(&self, c: char) -> bool {
        if self.readonly || c.is_control() {
            return false;
        }
        !self.numeric || c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBuffer {
    pub fields: Vec<Field>,
    pub focus: usize,
}

impl FormBuffer {
    pub fn subscribe() -> Self {
        Self::with_fields(vec![
            Field::text("Cedula"),
            Field::text("Email"),
            Field::text("Phone"),
            Field::number("Opening balance"),
        ])
    }

    /// The user id is shown but cannot be edited.
    pub fn transaction(cedula: &str) -> Self {
        Self::with_fields(vec![Field::fixed("Cedula", cedula), Field::number("Amount")])
    }

    fn with_fields(fields: Vec<Field>) -> Self {
        let focus = fields.iter().position(|f| !f.readonly).unwrap_or(0);
        Self { fields, focus }
    }

    pub fn next_field(&mut self) {
        self.step(1);
    }

    pub fn prev_field(&mut self) {
        self.step(self.fields.len().saturating_sub(1));
    }

    fn step(&mut self, by: usize) {
        let n = self.fields.len();
        if n == 0 {
            return;
        }
        for _ in 0..n {
            self.focus = (self.focus + by) % n;
            if !self.fields[self.focus].readonly {
                return;
            }
        }
    }

    pub fn push(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.accepts(c) {
                field.value.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if !field.readonly {
                field.value.pop();
            }
        }
    }

    fn value(&self, idx: usize) -> String {
        self.fields.get(idx).map(|f| f.value.clone()).unwrap_or_default()
    }

    pub fn to_subscribe_form(&self) -> SubscribeForm {
        SubscribeForm {
            cedula: self.value(0),
            correo: self.value(1),
            telefono: self.value(2),
            saldo: self.value(3),
        }
    }

    pub fn to_transaction_form(&self) -> TransactionForm {
        TransactionForm { monto: self.value(1) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(form: &mut FormBuffer, s: &str) {
        for c in s.chars() {
            form.push(c);
        }
    }

    #[test]
    fn test_subscribe_form_collects_fields() {
        let mut form = FormBuffer::subscribe();
        type_str(&mut form, "123");
        form.next_field();
        type_str(&mut form, "a@b.com");
        form.next_field();
        type_str(&mut form, "555");
        form.next_field();
        type_str(&mut form, "1x00");

        let f = form.to_subscribe_form();
        assert_eq!(f.cedula, "123");
        assert_eq!(f.correo, "a@b.com");
        assert_eq!(f.telefono, "555");
        assert_eq!(f.saldo, "100", "numeric field drops letters");
    }

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut form = FormBuffer::subscribe();
        form.prev_field();
        assert_eq!(form.focus, 3);
        form.next_field();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_transaction_form_skips_readonly() {
        let mut form = FormBuffer::transaction("123");
        assert_eq!(form.focus, 1);
        form.next_field();
        assert_eq!(form.focus, 1);
        type_str(&mut form, "25.5");
        form.backspace();
        assert_eq!(form.to_transaction_form().monto, "25.");
        assert_eq!(form.fields[0].value, "123");
    }
}
