pub trait Entity {
    type Id: PartialEq;

    fn id(&self) -> &Self::Id;
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
