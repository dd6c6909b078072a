/// A column of the ledger file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Category,
    Amount,
    Method,
    Description,
    Notes,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Category => "Category",
            Self::Amount => "Amount",
            Self::Method => "Method",
            Self::Description => "Description",
            Self::Notes => "Notes",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Category => "category",
            Self::Amount => "amount",
            Self::Method => "method",
            Self::Description => "description",
            Self::Notes => "notes",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        ALL_FIELDS.iter().find(|f| f.key() == key).copied()
    }
}

pub const ALL_FIELDS: &[Field] = &[
    Field::Date,
    Field::Category,
    Field::Amount,
    Field::Method,
    Field::Description,
    Field::Notes,
];

/// On-disk layout, fixed by the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerFormat {
    #[default]
    Standard,
    Extended,
}

impl LedgerFormat {
    pub fn header(&self) -> &'static str {
        match self {
            Self::Standard => "Date,Category,Amount,Method,Notes",
            Self::Extended => "Date,Category,Amount,Method,Description,Notes",
        }
    }

    pub fn fields(&self) -> &'static [Field] {
        match self {
            Self::Standard => &[
                Field::Date,
                Field::Category,
                Field::Amount,
                Field::Method,
                Field::Notes,
            ],
            Self::Extended => &[
                Field::Date,
                Field::Category,
                Field::Amount,
                Field::Method,
                Field::Description,
                Field::Notes,
            ],
        }
    }

    pub fn field_count(&self) -> usize {
        self.fields().len()
    }

    pub fn comma_count(&self) -> usize {
        self.field_count() - 1
    }

    /// Pick the format whose header matches exactly, falling back to the
    /// standard layout when the header is unrecognized.
    pub fn detect(header: &str) -> (LedgerFormat, bool) {
        if header == Self::Extended.header() {
            (Self::Extended, true)
        } else {
            (Self::Standard, header == Self::Standard.header())
        }
    }

    pub fn index_of(&self, field: Field) -> Option<usize> {
        self.fields().iter().position(|f| *f == field)
    }
}

/// One field exactly as written on disk plus its unescaped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    pub raw: String,
    pub value: String,
    pub quoted: bool,
}

/// A parsed ledger line. Never mutated after construction; reordering or
/// de-duplicating produces new sequences of records.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    line: usize,
    raw: String,
    format: LedgerFormat,
    fields: Vec<RawField>,
    cents: i64,
}

impl Record {
    pub(crate) fn new(
        line: usize,
        raw: String,
        format: LedgerFormat,
        fields: Vec<RawField>,
        cents: i64,
    ) -> Self {
        Self {
            line,
            raw,
            format,
            fields,
            cents,
        }
    }

    /// 1-based line number in the file (the header is line 1).
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn format(&self) -> LedgerFormat {
        self.format
    }

    pub fn fields(&self) -> &[RawField] {
        &self.fields
    }

    pub fn field(&self, field: Field) -> Option<&RawField> {
        self.format.index_of(field).and_then(|i| self.fields.get(i))
    }

    /// Unescaped value of a field, or "" when the format lacks it.
    pub fn value(&self, field: Field) -> &str {
        self.field(field).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn date(&self) -> &str {
        self.value(Field::Date)
    }

    pub fn category(&self) -> &str {
        self.value(Field::Category)
    }

    pub fn method(&self) -> &str {
        self.value(Field::Method)
    }

    pub fn description(&self) -> &str {
        self.value(Field::Description)
    }

    pub fn notes(&self) -> &str {
        self.value(Field::Notes)
    }

    /// Amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }
}
