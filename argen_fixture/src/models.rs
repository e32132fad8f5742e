use argen_runtime::ActiveRecord;

/// +AR
/// +AR has_many Posts
/// +AR scope Recent
/// +AR scope Popular
#[derive(ActiveRecord, Debug, Clone, Default, PartialEq)]
pub struct User {
    #[ar(primary_key)]
    pub id: i64,
    #[ar(presence, length(is = 3))]
    pub name: String,
}

/// +AR
/// +AR belongs_to User
#[derive(ActiveRecord, Debug, Clone, Default, PartialEq)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    #[ar(numericality(only_integer, greater_than_or_equal_to = 0))]
    pub votes: i64,
}
