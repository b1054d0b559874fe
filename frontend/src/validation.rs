//! 表单的客户端校验，失败时不会发出任何网络请求

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 必填字段为空，携带字段的显示名
    Required(&'static str),
    PasswordMismatch,
    PasswordTooShort { min: usize },
    InvalidEmail,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required(field) => write!(f, "Le champ « {} » est obligatoire.", field),
            ValidationError::PasswordMismatch => {
                write!(f, "Les mots de passe ne correspondent pas.")
            }
            ValidationError::PasswordTooShort { min } => {
                write!(f, "Le mot de passe doit contenir au moins {} caractères.", min)
            }
            ValidationError::InvalidEmail => write!(f, "Adresse email invalide."),
        }
    }
}

impl std::error::Error for ValidationError {}

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn required(label: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(label))
    } else {
        Ok(())
    }
}

pub fn email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidEmail),
    }
}

/// 新密码与确认密码
pub fn new_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}
