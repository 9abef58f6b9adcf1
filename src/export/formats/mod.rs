pub mod haplogroup;
