mod dog_detail;
mod dog_list;

pub use dog_detail::DogDetailView;
pub use dog_list::DogListView;
