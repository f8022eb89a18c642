/// Number of tab-separated fields on a CoNLL-U token line.
pub const CONLLU_COLUMNS: usize = 10;

/// Header of the tidy table: four context columns followed by the token columns.
pub const TABLE_COLUMNS: [&str; 14] = [
    "doc_id",
    "paragraph_id",
    "sentence_id",
    "sentence_text",
    "id",
    "form",
    "lemma",
    "upostag",
    "xpostag",
    "feats",
    "head",
    "deprel",
    "deps",
    "misc",
];

/// The ten token columns, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Column {
    Id = 0,
    Form = 1,
    Lemma = 2,
    UPosTag = 3,
    XPosTag = 4,
    Feats = 5,
    Head = 6,
    DepRel = 7,
    Deps = 8,
    Misc = 9,
}

impl Column {
    pub const ALL: [Column; CONLLU_COLUMNS] = [
        Column::Id,
        Column::Form,
        Column::Lemma,
        Column::UPosTag,
        Column::XPosTag,
        Column::Feats,
        Column::Head,
        Column::DepRel,
        Column::Deps,
        Column::Misc,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Form => "form",
            Column::Lemma => "lemma",
            Column::UPosTag => "upostag",
            Column::XPosTag => "xpostag",
            Column::Feats => "feats",
            Column::Head => "head",
            Column::DepRel => "deprel",
            Column::Deps => "deps",
            Column::Misc => "misc",
        }
    }
}
