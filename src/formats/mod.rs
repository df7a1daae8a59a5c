pub mod election_file;
