use std::collections::BTreeMap;
use std::fmt;

use crate::auth::models::Role;
use crate::db::models::{ArticleInput, Biography, MemberInput, NewMemberInput, NewsInput};
use crate::error::AppError;

/// Role options offered when creating a member.
pub const NEW_MEMBER_ROLES: &[(&str, &str)] = &[("admin", "Admin"), ("manager", "Manager")];

/// Role options offered when a super user edits a member.
pub const ALL_ROLES: &[(&str, &str)] = &[
    ("super", "Super Admin"),
    ("admin", "Admin"),
    ("manager", "Manager"),
];

/// How a field is rendered and read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    TextArea,
    /// Textarea with a rendered preview next to it.
    Markdown,
    /// URL input with an inline image preview.
    ImageUrl,
    Checkbox,
    Select(&'static [(&'static str, &'static str)]),
    /// Derived from the named field until edited by hand.
    Slug { source: &'static str },
    /// `key = value` per line.
    Pairs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Raw string values of a form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    /// Trimmed value, for fields where surrounding whitespace is noise.
    pub fn trimmed(&self, name: &str) -> String {
        self.get(name).trim().to_string()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name) == "true"
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.set(name, if value { "true" } else { "false" });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join(" "))
    }
}

impl From<FormErrors> for AppError {
    fn from(errors: FormErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

/// Check every required field holds a non-blank value.
pub fn validate_required(fields: &[FieldSpec], values: &FormValues) -> FormErrors {
    let mut errors = FormErrors::default();
    for field in fields {
        if field.required
            && field.kind != FieldKind::Checkbox
            && values.get(field.name).trim().is_empty()
        {
            errors.push(field.name, format!("{} is required.", field.label));
        }
    }
    errors
}

/// Parse `platform = url` lines. Blank lines are skipped.
pub fn parse_pairs(text: &str) -> Result<BTreeMap<String, String>, String> {
    let mut pairs = BTreeMap::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(format!("Line {} must look like `platform = url`.", idx + 1));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("Line {} is missing a platform name.", idx + 1));
        }
        pairs.insert(key.to_string(), value.trim().to_string());
    }
    Ok(pairs)
}

pub fn format_pairs(pairs: &BTreeMap<String, String>) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k} = {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A payload edited through the generic document form.
pub trait FormModel: Sized {
    fn fields() -> Vec<FieldSpec>;

    fn to_values(&self) -> FormValues;

    /// Build the payload without validating it.
    fn read_values(values: &FormValues) -> Result<Self, FormErrors>;

    /// The rules checked both in the browser and on the server.
    fn check(&self) -> Result<(), FormErrors> {
        validate_required(&Self::fields(), &self.to_values()).into_result()
    }

    fn from_values(values: &FormValues) -> Result<Self, FormErrors> {
        let model = Self::read_values(values)?;
        model.check()?;
        Ok(model)
    }
}

impl FormModel for ArticleInput {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("title", "Title", FieldKind::Text).required(),
            FieldSpec::new("slug", "Slug", FieldKind::Slug { source: "title" }),
            FieldSpec::new("author_name", "Author", FieldKind::Text).required(),
            FieldSpec::new("label", "Label", FieldKind::Text),
            FieldSpec::new("read", "Read time", FieldKind::Text),
            FieldSpec::new("description", "Description", FieldKind::TextArea),
            FieldSpec::new("img", "Cover image URL", FieldKind::ImageUrl),
            FieldSpec::new("img_alt", "Cover image alt text", FieldKind::Text),
            FieldSpec::new("content", "Content", FieldKind::Markdown).required(),
            FieldSpec::new("popularity", "Popular", FieldKind::Checkbox),
            FieldSpec::new("published", "Published", FieldKind::Checkbox),
        ]
    }

    fn to_values(&self) -> FormValues {
        let mut v = FormValues::new()
            .with("title", &self.title)
            .with("slug", &self.slug)
            .with("author_name", &self.author_name)
            .with("label", &self.label)
            .with("read", &self.read)
            .with("description", &self.description)
            .with("img", &self.img)
            .with("img_alt", &self.img_alt)
            .with("content", &self.content);
        v.set_bool("popularity", self.popularity);
        v.set_bool("published", self.published);
        v
    }

    fn read_values(values: &FormValues) -> Result<Self, FormErrors> {
        Ok(Self {
            title: values.trimmed("title"),
            content: values.get("content").to_string(),
            description: values.get("description").to_string(),
            img: values.trimmed("img"),
            img_alt: values.trimmed("img_alt"),
            label: values.trimmed("label"),
            popularity: values.get_bool("popularity"),
            read: values.trimmed("read"),
            slug: values.trimmed("slug"),
            author_name: values.trimmed("author_name"),
            published: values.get_bool("published"),
        })
    }
}

impl FormModel for NewsInput {
    fn fields() -> Vec<FieldSpec> {
        vec![FieldSpec::new("title", "Title", FieldKind::Text).required()]
    }

    fn to_values(&self) -> FormValues {
        FormValues::new().with("title", &self.title)
    }

    fn read_values(values: &FormValues) -> Result<Self, FormErrors> {
        Ok(Self {
            title: values.trimmed("title"),
        })
    }
}

impl FormModel for NewMemberInput {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name", "Name", FieldKind::Text).required(),
            FieldSpec::new("slug", "Slug", FieldKind::Slug { source: "name" }),
            FieldSpec::new("email", "Email", FieldKind::Email).required(),
            FieldSpec::new("password", "Password", FieldKind::Password).required(),
            FieldSpec::new("role", "Role", FieldKind::Select(NEW_MEMBER_ROLES)).required(),
            FieldSpec::new("city", "City", FieldKind::Text),
            FieldSpec::new("job", "Job", FieldKind::Text),
        ]
    }

    fn to_values(&self) -> FormValues {
        FormValues::new()
            .with("name", &self.name)
            .with("slug", &self.slug)
            .with("email", &self.email)
            .with("password", &self.password)
            .with("role", &self.role)
            .with("city", &self.city)
            .with("job", &self.job)
    }

    fn read_values(values: &FormValues) -> Result<Self, FormErrors> {
        Ok(Self {
            name: values.trimmed("name"),
            city: values.trimmed("city"),
            job: values.trimmed("job"),
            role: values.trimmed("role"),
            email: values.trimmed("email"),
            password: values.get("password").to_string(),
            slug: values.trimmed("slug"),
        })
    }

    fn check(&self) -> Result<(), FormErrors> {
        let mut errors = validate_required(&Self::fields(), &self.to_values());
        if errors.for_field("role").is_none() && self.assigned_role().is_none() {
            errors.push("role", "Role must be Admin or Manager.");
        }
        errors.into_result()
    }
}

impl NewMemberInput {
    /// The requested role, if it is one a new member may receive.
    pub fn assigned_role(&self) -> Option<Role> {
        Role::from_str_ci(&self.role).filter(|r| Role::ASSIGNABLE_ON_CREATE.contains(r))
    }
}

impl FormModel for MemberInput {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name", "Name", FieldKind::Text).required(),
            FieldSpec::new("slug", "Slug", FieldKind::Slug { source: "name" }),
            FieldSpec::new("role", "Role", FieldKind::Select(ALL_ROLES)),
            FieldSpec::new("city", "City", FieldKind::Text),
            FieldSpec::new("job", "Job", FieldKind::Text),
            FieldSpec::new("avatar", "Avatar URL", FieldKind::ImageUrl),
            FieldSpec::new("avatar_alt", "Avatar alt text", FieldKind::Text),
            FieldSpec::new("bio_summary", "Bio summary", FieldKind::TextArea),
            FieldSpec::new("bio_body", "Biography", FieldKind::Markdown),
            FieldSpec::new("socials", "Social links", FieldKind::Pairs),
        ]
    }

    fn to_values(&self) -> FormValues {
        FormValues::new()
            .with("name", &self.name)
            .with("slug", &self.slug)
            .with("role", self.role.map(|r| r.as_str()).unwrap_or(""))
            .with("city", &self.city)
            .with("job", &self.job)
            .with("avatar", &self.avatar)
            .with("avatar_alt", &self.avatar_alt)
            .with("bio_summary", &self.biography.summary)
            .with("bio_body", &self.biography.body)
            .with("socials", format_pairs(&self.socials))
    }

    fn read_values(values: &FormValues) -> Result<Self, FormErrors> {
        let socials = parse_pairs(values.get("socials")).map_err(|msg| {
            let mut errors = FormErrors::default();
            errors.push("socials", msg);
            errors
        })?;

        Ok(Self {
            name: values.trimmed("name"),
            city: values.trimmed("city"),
            job: values.trimmed("job"),
            avatar: values.trimmed("avatar"),
            avatar_alt: values.trimmed("avatar_alt"),
            biography: Biography {
                body: values.get("bio_body").to_string(),
                summary: values.get("bio_summary").to_string(),
            },
            slug: values.trimmed("slug"),
            socials,
            role: Role::from_str_ci(values.get("role")),
        })
    }
}
