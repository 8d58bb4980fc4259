//! Grammatical attributes of tokens and syntax tree nodes.
//!
//! One enum covers both lexemes and reduced constructs: a token node keeps
//! its lexical attribute, and a reduction produces a node whose attribute
//! names the construct.

use std::fmt;

/// Grammatical attribute code.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Attribute {
    // Punctuation
    OpenSymbol,
    CloseSymbol,
    SubSymbol,
    BusSymbol,
    CommaSymbol,
    SemiSymbol,
    ColonSymbol,
    PointSymbol,
    BarSymbol,
    ElseBarSymbol,

    // Reserved words
    BeginSymbol,
    EndSymbol,
    IfSymbol,
    ThenSymbol,
    ElifSymbol,
    ElseSymbol,
    FiSymbol,
    CaseSymbol,
    InSymbol,
    OuseSymbol,
    OutSymbol,
    EsacSymbol,
    ForSymbol,
    FromSymbol,
    BySymbol,
    ToSymbol,
    WhileSymbol,
    DoSymbol,
    OdSymbol,
    ExitSymbol,
    GotoSymbol,
    SkipSymbol,
    NilSymbol,
    EmptySymbol,
    TrueSymbol,
    FalseSymbol,
    ModeSymbol,
    PrioSymbol,
    OpSymbol,
    ProcSymbol,
    LocSymbol,
    HeapSymbol,
    RefSymbol,
    FlexSymbol,
    StructSymbol,
    UnionSymbol,
    LongSymbol,
    OfSymbol,
    IsSymbol,
    IsntSymbol,
    AndfSymbol,
    OrfSymbol,
    AssignSymbol,
    EqualsSymbol,

    // Lexemes
    Identifier,
    BoldTag,
    Operator,
    IntDenotation,
    RealDenotation,
    BitsDenotation,
    RowCharDenotation,

    // Enclosed clauses and their parts
    ParticularProgram,
    SerialClause,
    EnquiryClause,
    ClosedClause,
    CollateralClause,
    ConditionalClause,
    CaseClause,
    ConformityClause,
    LoopClause,
    ThenPart,
    ElsePart,
    InPart,
    OutPart,
    SpecifiedUnit,
    Specifier,
    ForPart,
    FromPart,
    ByPart,
    ToPart,
    WhilePart,
    DoPart,
    Label,
    LabeledUnit,
    Completer,

    // Declarations
    IdentityDeclaration,
    VariableDeclaration,
    ProcedureDeclaration,
    ProcedureVariableDeclaration,
    ModeDeclaration,
    PriorityDeclaration,
    OperatorDeclaration,
    DefiningIdentifier,
    DefiningIndicant,
    DefiningOperator,
    Priority,

    // Declarers
    Indicant,
    RefDeclarer,
    RowDeclarer,
    FlexDeclarer,
    StructDeclarer,
    UnionDeclarer,
    ProcDeclarer,
    Bounds,
    Bound,
    Field,
    ParameterPack,
    Parameter,

    // Units
    Assignation,
    IdentityRelation,
    AndFunction,
    OrFunction,
    Formula,
    MonadicFormula,
    Call,
    ArgumentList,
    Slice,
    Indexer,
    Trimmer,
    Selection,
    Cast,
    Generator,
    RoutineText,
    BoolDenotation,
    EmptyDenotation,
    Skip,
    Nihil,
    Jump,
    Erroneous,

    // Coercions
    Dereferencing,
    Deproceduring,
    Uniting,
    Widening,
    Rowing,
    Voiding,
}

impl Attribute {
    /// Human-readable name, used in "expected X" diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Attribute::OpenSymbol => "(",
            Attribute::CloseSymbol => ")",
            Attribute::SubSymbol => "[",
            Attribute::BusSymbol => "]",
            Attribute::CommaSymbol => ",",
            Attribute::SemiSymbol => ";",
            Attribute::ColonSymbol => ":",
            Attribute::PointSymbol => ".",
            Attribute::BarSymbol => "|",
            Attribute::ElseBarSymbol => "|:",
            Attribute::BeginSymbol => "BEGIN",
            Attribute::EndSymbol => "END",
            Attribute::IfSymbol => "IF",
            Attribute::ThenSymbol => "THEN",
            Attribute::ElifSymbol => "ELIF",
            Attribute::ElseSymbol => "ELSE",
            Attribute::FiSymbol => "FI",
            Attribute::CaseSymbol => "CASE",
            Attribute::InSymbol => "IN",
            Attribute::OuseSymbol => "OUSE",
            Attribute::OutSymbol => "OUT",
            Attribute::EsacSymbol => "ESAC",
            Attribute::ForSymbol => "FOR",
            Attribute::FromSymbol => "FROM",
            Attribute::BySymbol => "BY",
            Attribute::ToSymbol => "TO",
            Attribute::WhileSymbol => "WHILE",
            Attribute::DoSymbol => "DO",
            Attribute::OdSymbol => "OD",
            Attribute::ExitSymbol => "EXIT",
            Attribute::GotoSymbol => "GOTO",
            Attribute::SkipSymbol => "SKIP",
            Attribute::NilSymbol => "NIL",
            Attribute::EmptySymbol => "EMPTY",
            Attribute::TrueSymbol => "TRUE",
            Attribute::FalseSymbol => "FALSE",
            Attribute::ModeSymbol => "MODE",
            Attribute::PrioSymbol => "PRIO",
            Attribute::OpSymbol => "OP",
            Attribute::ProcSymbol => "PROC",
            Attribute::LocSymbol => "LOC",
            Attribute::HeapSymbol => "HEAP",
            Attribute::RefSymbol => "REF",
            Attribute::FlexSymbol => "FLEX",
            Attribute::StructSymbol => "STRUCT",
            Attribute::UnionSymbol => "UNION",
            Attribute::LongSymbol => "LONG",
            Attribute::OfSymbol => "OF",
            Attribute::IsSymbol => "IS",
            Attribute::IsntSymbol => "ISNT",
            Attribute::AndfSymbol => "ANDF",
            Attribute::OrfSymbol => "ORF",
            Attribute::AssignSymbol => ":=",
            Attribute::EqualsSymbol => "=",
            Attribute::Identifier => "identifier",
            Attribute::BoldTag => "bold tag",
            Attribute::Operator => "operator",
            Attribute::IntDenotation => "integral denotation",
            Attribute::RealDenotation => "real denotation",
            Attribute::BitsDenotation => "bits denotation",
            Attribute::RowCharDenotation => "string denotation",
            Attribute::ParticularProgram => "particular program",
            Attribute::SerialClause => "serial clause",
            Attribute::EnquiryClause => "enquiry clause",
            Attribute::ClosedClause => "closed clause",
            Attribute::CollateralClause => "collateral clause",
            Attribute::ConditionalClause => "conditional clause",
            Attribute::CaseClause => "case clause",
            Attribute::ConformityClause => "conformity clause",
            Attribute::LoopClause => "loop clause",
            Attribute::ThenPart => "then part",
            Attribute::ElsePart => "else part",
            Attribute::InPart => "in part",
            Attribute::OutPart => "out part",
            Attribute::SpecifiedUnit => "specified unit",
            Attribute::Specifier => "specifier",
            Attribute::ForPart => "for part",
            Attribute::FromPart => "from part",
            Attribute::ByPart => "by part",
            Attribute::ToPart => "to part",
            Attribute::WhilePart => "while part",
            Attribute::DoPart => "do part",
            Attribute::Label => "label",
            Attribute::LabeledUnit => "labeled unit",
            Attribute::Completer => "completer",
            Attribute::IdentityDeclaration => "identity declaration",
            Attribute::VariableDeclaration => "variable declaration",
            Attribute::ProcedureDeclaration => "procedure declaration",
            Attribute::ProcedureVariableDeclaration => "procedure variable declaration",
            Attribute::ModeDeclaration => "mode declaration",
            Attribute::PriorityDeclaration => "priority declaration",
            Attribute::OperatorDeclaration => "operator declaration",
            Attribute::DefiningIdentifier => "defining identifier",
            Attribute::DefiningIndicant => "defining indicant",
            Attribute::DefiningOperator => "defining operator",
            Attribute::Priority => "priority",
            Attribute::Indicant => "indicant",
            Attribute::RefDeclarer => "reference declarer",
            Attribute::RowDeclarer => "row declarer",
            Attribute::FlexDeclarer => "flexible row declarer",
            Attribute::StructDeclarer => "structure declarer",
            Attribute::UnionDeclarer => "united declarer",
            Attribute::ProcDeclarer => "procedure declarer",
            Attribute::Bounds => "bounds",
            Attribute::Bound => "bound",
            Attribute::Field => "field",
            Attribute::ParameterPack => "parameter pack",
            Attribute::Parameter => "parameter",
            Attribute::Assignation => "assignation",
            Attribute::IdentityRelation => "identity relation",
            Attribute::AndFunction => "pseudo-operator ANDF",
            Attribute::OrFunction => "pseudo-operator ORF",
            Attribute::Formula => "formula",
            Attribute::MonadicFormula => "monadic formula",
            Attribute::Call => "call",
            Attribute::ArgumentList => "argument list",
            Attribute::Slice => "slice",
            Attribute::Indexer => "indexer",
            Attribute::Trimmer => "trimmer",
            Attribute::Selection => "selection",
            Attribute::Cast => "cast",
            Attribute::Generator => "generator",
            Attribute::RoutineText => "routine text",
            Attribute::BoolDenotation => "boolean denotation",
            Attribute::EmptyDenotation => "EMPTY",
            Attribute::Skip => "SKIP",
            Attribute::Nihil => "NIL",
            Attribute::Jump => "jump",
            Attribute::Erroneous => "erroneous construct",
            Attribute::Dereferencing => "dereferencing",
            Attribute::Deproceduring => "deproceduring",
            Attribute::Uniting => "uniting",
            Attribute::Widening => "widening",
            Attribute::Rowing => "rowing",
            Attribute::Voiding => "voiding",
        }
    }

    /// Whether this is a denotation lexeme or denotation node.
    pub const fn is_denotation(self) -> bool {
        matches!(
            self,
            Attribute::IntDenotation
                | Attribute::RealDenotation
                | Attribute::BitsDenotation
                | Attribute::RowCharDenotation
                | Attribute::BoolDenotation
                | Attribute::EmptyDenotation
        )
    }

    /// Whether this node was synthesised by the coercion inserter.
    pub const fn is_coercion(self) -> bool {
        matches!(
            self,
            Attribute::Dereferencing
                | Attribute::Deproceduring
                | Attribute::Uniting
                | Attribute::Widening
                | Attribute::Rowing
                | Attribute::Voiding
        )
    }

    /// Whether this is a declaration node.
    pub const fn is_declaration(self) -> bool {
        matches!(
            self,
            Attribute::IdentityDeclaration
                | Attribute::VariableDeclaration
                | Attribute::ProcedureDeclaration
                | Attribute::ProcedureVariableDeclaration
                | Attribute::ModeDeclaration
                | Attribute::PriorityDeclaration
                | Attribute::OperatorDeclaration
        )
    }

    /// Whether this is a declarer node.
    pub const fn is_declarer(self) -> bool {
        matches!(
            self,
            Attribute::Indicant
                | Attribute::RefDeclarer
                | Attribute::RowDeclarer
                | Attribute::FlexDeclarer
                | Attribute::StructDeclarer
                | Attribute::UnionDeclarer
                | Attribute::ProcDeclarer
        )
    }

    /// Opening bracket paired with this closing bracket, if any.
    pub const fn opener_of(self) -> Option<Attribute> {
        match self {
            Attribute::CloseSymbol => Some(Attribute::OpenSymbol),
            Attribute::BusSymbol => Some(Attribute::SubSymbol),
            Attribute::EndSymbol => Some(Attribute::BeginSymbol),
            Attribute::FiSymbol => Some(Attribute::IfSymbol),
            Attribute::EsacSymbol => Some(Attribute::CaseSymbol),
            Attribute::OdSymbol => Some(Attribute::DoSymbol),
            _ => None,
        }
    }

    /// Closing bracket paired with this opening bracket, if any.
    pub const fn closer_of(self) -> Option<Attribute> {
        match self {
            Attribute::OpenSymbol => Some(Attribute::CloseSymbol),
            Attribute::SubSymbol => Some(Attribute::BusSymbol),
            Attribute::BeginSymbol => Some(Attribute::EndSymbol),
            Attribute::IfSymbol => Some(Attribute::FiSymbol),
            Attribute::CaseSymbol => Some(Attribute::EsacSymbol),
            Attribute::DoSymbol => Some(Attribute::OdSymbol),
            _ => None,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
