fn main() {
  dogscribe::main();
}
