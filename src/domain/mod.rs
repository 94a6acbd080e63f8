pub mod analysis;
pub mod company;
pub mod extracted_facts;
pub mod linkedin;
pub mod search_hit;
